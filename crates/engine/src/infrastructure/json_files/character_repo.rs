//! JSON-file character repository.

use async_trait::async_trait;
use worldsim_domain::Character;

use super::helpers::JsonDirectory;
use crate::infrastructure::ports::{CharacterRepo, EntityFilter, RepoError};

/// Characters stored as `characters/{id}.json`.
pub struct JsonCharacterRepo {
    dir: JsonDirectory,
}

impl JsonCharacterRepo {
    pub(super) fn new(dir: JsonDirectory) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl CharacterRepo for JsonCharacterRepo {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Character>, RepoError> {
        let characters: Vec<Character> = self.dir.load_all().await?;
        Ok(characters
            .into_iter()
            .filter(|c| filter.matches(&c.id, &c.name))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Character>, RepoError> {
        self.dir.load(id).await
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.dir.store(&character.id, character).await
    }
}
