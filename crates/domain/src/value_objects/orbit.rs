//! One-hop neighborhood of a character.

use serde::{Deserialize, Serialize};

use crate::entities::{Character, Location, Relation};

/// A focus character plus its outgoing relations and the nodes they point at.
///
/// Only relations whose X node is the focus character are included; edges
/// pointing into the character are not part of its orbit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOrbit {
    pub character: Character,
    pub relations: Vec<Relation>,
    pub related_characters: Vec<Character>,
    pub related_locations: Vec<Location>,
}

impl CharacterOrbit {
    /// An orbit with no relations.
    pub fn isolated(character: Character) -> Self {
        Self {
            character,
            relations: Vec::new(),
            related_characters: Vec::new(),
            related_locations: Vec::new(),
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.relations.is_empty()
    }
}
