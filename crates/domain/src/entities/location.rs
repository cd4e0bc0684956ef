//! Location entity - a place in the world

use serde::{Deserialize, Serialize};

use super::{NamedEntity, NodeType};
use crate::slugify;

/// A location in the world. Same shape as [`super::Character`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Location {
    /// Create a location whose id is the slug of its name.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            description: description.into(),
        }
    }
}

impl NamedEntity for Location {
    const NODE_TYPE: NodeType = NodeType::Location;

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
