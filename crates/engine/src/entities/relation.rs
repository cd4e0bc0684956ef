//! Relation entity operations.

use std::sync::Arc;
use worldsim_domain::Relation;

use crate::infrastructure::ports::{RelationFilter, RelationRepo, RepoError};

/// Relation entity operations.
pub struct Relations {
    repo: Arc<dyn RelationRepo>,
}

impl Relations {
    pub fn new(repo: Arc<dyn RelationRepo>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<Relation>, RepoError> {
        self.repo.list(&RelationFilter::all()).await
    }

    /// Relations whose X node is `node_id`.
    pub async fn list_from(&self, node_id: &str) -> Result<Vec<Relation>, RepoError> {
        self.repo.list(&RelationFilter::from_node(node_id)).await
    }

    pub async fn get(&self, x_node_id: &str, y_node_id: &str) -> Result<Option<Relation>, RepoError> {
        let relation = self.repo.get(x_node_id, y_node_id).await?;
        if relation.is_none() {
            tracing::warn!(%x_node_id, %y_node_id, "Relation not found");
        }
        Ok(relation)
    }

    pub async fn save(&self, relation: &Relation) -> Result<(), RepoError> {
        self.repo.save(relation).await
    }

    /// Not atomic: a failure leaves earlier saves in place.
    pub async fn save_many(&self, relations: &[Relation]) -> Result<(), RepoError> {
        for relation in relations {
            self.repo.save(relation).await?;
        }
        Ok(())
    }
}
