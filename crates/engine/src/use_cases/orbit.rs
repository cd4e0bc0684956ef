//! Character orbit use case.
//!
//! An orbit is exactly one hop: the focus character's outgoing relations and
//! the records those relations point at. Relations pointing into the
//! character are not followed.

use std::sync::Arc;

use worldsim_domain::{Character, CharacterOrbit, NodeType};

use crate::entities::{Characters, Locations, Relations};
use crate::infrastructure::ports::RepoError;

/// Assembles a character's orbit fresh from the store on every call.
pub struct OrbitAssembler {
    characters: Arc<Characters>,
    locations: Arc<Locations>,
    relations: Arc<Relations>,
}

impl OrbitAssembler {
    pub fn new(
        characters: Arc<Characters>,
        locations: Arc<Locations>,
        relations: Arc<Relations>,
    ) -> Self {
        Self {
            characters,
            locations,
            relations,
        }
    }

    pub async fn get_character_orbit(
        &self,
        character: &Character,
    ) -> Result<CharacterOrbit, RepoError> {
        let relations = self.relations.list_from(&character.id).await?;

        let mut character_ids: Vec<String> = Vec::new();
        let mut location_ids: Vec<String> = Vec::new();
        for relation in &relations {
            let ids = match relation.y_node_type {
                NodeType::Character => &mut character_ids,
                NodeType::Location => &mut location_ids,
            };
            if !ids.contains(&relation.y_node_id) {
                ids.push(relation.y_node_id.clone());
            }
        }

        let related_characters = if character_ids.is_empty() {
            Vec::new()
        } else {
            self.characters.list_by_ids(&character_ids).await?
        };
        let related_locations = if location_ids.is_empty() {
            Vec::new()
        } else {
            self.locations.list_by_ids(&location_ids).await?
        };

        let unresolved = (character_ids.len() + location_ids.len())
            .saturating_sub(related_characters.len() + related_locations.len());
        if unresolved > 0 {
            tracing::debug!(
                character_id = %character.id,
                unresolved,
                "Orbit references nodes missing from the store"
            );
        }

        Ok(CharacterOrbit {
            character: character.clone(),
            relations,
            related_characters,
            related_locations,
        })
    }
}
