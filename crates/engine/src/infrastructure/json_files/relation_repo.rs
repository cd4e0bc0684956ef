//! JSON-file relation repository.

use async_trait::async_trait;
use worldsim_domain::Relation;

use super::helpers::JsonDirectory;
use crate::infrastructure::ports::{relation_key, RelationFilter, RelationRepo, RepoError};

/// Relations stored as `relations/{x_node_id}--{y_node_id}.json`.
pub struct JsonRelationRepo {
    dir: JsonDirectory,
}

impl JsonRelationRepo {
    pub(super) fn new(dir: JsonDirectory) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl RelationRepo for JsonRelationRepo {
    async fn list(&self, filter: &RelationFilter) -> Result<Vec<Relation>, RepoError> {
        let relations: Vec<Relation> = self.dir.load_all().await?;
        let filtered: Vec<Relation> = relations
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        tracing::debug!(
            x_node_id = ?filter.x_node_id_eq,
            count = filtered.len(),
            "Filtered relations"
        );
        Ok(filtered)
    }

    async fn get(&self, x_node_id: &str, y_node_id: &str) -> Result<Option<Relation>, RepoError> {
        self.dir.load(&relation_key(x_node_id, y_node_id)?).await
    }

    async fn save(&self, relation: &Relation) -> Result<(), RepoError> {
        let (x, y) = relation.key();
        self.dir.store(&relation_key(x, y)?, relation).await
    }
}
