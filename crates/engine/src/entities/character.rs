//! Character entity operations.

use std::sync::Arc;
use worldsim_domain::Character;

use crate::infrastructure::ports::{CharacterRepo, EntityFilter, RepoError};

/// Character entity operations.
///
/// Encapsulates all character queries and mutations.
pub struct Characters {
    repo: Arc<dyn CharacterRepo>,
}

impl Characters {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list(&self, filter: &EntityFilter) -> Result<Vec<Character>, RepoError> {
        self.repo.list(filter).await
    }

    pub async fn list_all(&self) -> Result<Vec<Character>, RepoError> {
        self.repo.list(&EntityFilter::all()).await
    }

    pub async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Character>, RepoError> {
        self.repo.list(&EntityFilter::ids(ids.iter().cloned())).await
    }

    /// A miss is logged and returned as `None`.
    pub async fn get(&self, id: &str) -> Result<Option<Character>, RepoError> {
        let character = self.repo.get(id).await?;
        if character.is_none() {
            tracing::warn!(character_id = %id, "Character not found");
        }
        Ok(character)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.repo.save(character).await
    }

    /// Save each character in turn. Stops at the first failure; earlier
    /// saves are kept.
    pub async fn save_many(&self, characters: &[Character]) -> Result<(), RepoError> {
        for character in characters {
            self.repo.save(character).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn get_miss_is_none_not_error() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq("nobody"))
            .returning(|_| Ok(None));

        let characters = Characters::new(Arc::new(repo));
        assert_eq!(characters.get("nobody").await.expect("get"), None);
    }

    #[tokio::test]
    async fn save_many_stops_at_first_failure_without_rollback() {
        let mut repo = MockCharacterRepo::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_save()
            .withf(|c| c.id == "ada")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        repo.expect_save()
            .withf(|c| c.id == "bram")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepoError::storage("write", "disk full")));

        let characters = Characters::new(Arc::new(repo));
        let batch = [
            Character::new("Ada", "first"),
            Character::new("Bram", "second"),
            Character::new("Cato", "never written"),
        ];
        let err = characters.save_many(&batch).await.expect_err("fails");
        assert!(matches!(err, RepoError::Storage { .. }));
    }

    #[tokio::test]
    async fn list_by_ids_builds_id_filter() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_list()
            .withf(|filter| {
                filter.id_in.as_deref() == Some(&["mira".to_string()][..]) && filter.name_in.is_none()
            })
            .returning(|_| Ok(vec![Character::new("Mira", "harbor master")]));

        let characters = Characters::new(Arc::new(repo));
        let found = characters
            .list_by_ids(&["mira".to_string()])
            .await
            .expect("list");
        assert_eq!(found.len(), 1);
    }
}
