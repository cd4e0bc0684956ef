//! Structured result of one upkeep pass over a vignette.

use serde::{Deserialize, Serialize};

use crate::entities::{Character, Location, Relation};

/// New and re-mentioned world elements found in a vignette.
///
/// `new_*` lists hold elements not yet catalogued; `features_existing_*`
/// lists hold catalogued elements the vignette merely mentions again. The two
/// are kept separate and only `new_*` elements are ever persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElementsAnalysis {
    pub new_characters: Vec<Character>,
    pub new_locations: Vec<Location>,
    pub new_relations: Vec<Relation>,
    #[serde(default)]
    pub features_existing_characters: Vec<Character>,
    #[serde(default)]
    pub features_existing_locations: Vec<Location>,
    #[serde(default)]
    pub features_existing_relations: Vec<Relation>,
}

impl NewElementsAnalysis {
    /// Whether the pass found nothing new to persist.
    pub fn has_no_new_elements(&self) -> bool {
        self.new_characters.is_empty()
            && self.new_locations.is_empty()
            && self.new_relations.is_empty()
    }
}
