//! Character entity - a person (or creature) living in the world

use serde::{Deserialize, Serialize};

use super::{NamedEntity, NodeType};
use crate::slugify;

/// A character in the world.
///
/// Simple data struct with public fields; the id is expected to be the slug
/// of `name`, which the upkeep pass enforces before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    /// Full name of this character
    pub name: String,
    /// Core description of this character
    pub description: String,
}

impl Character {
    /// Create a character whose id is the slug of its name.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            description: description.into(),
        }
    }
}

impl NamedEntity for Character {
    const NODE_TYPE: NodeType = NodeType::Character;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
