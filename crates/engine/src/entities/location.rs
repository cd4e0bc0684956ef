//! Location entity operations.

use std::sync::Arc;
use worldsim_domain::Location;

use crate::infrastructure::ports::{EntityFilter, LocationRepo, RepoError};

/// Location entity operations.
pub struct Locations {
    repo: Arc<dyn LocationRepo>,
}

impl Locations {
    pub fn new(repo: Arc<dyn LocationRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filter: &EntityFilter) -> Result<Vec<Location>, RepoError> {
        self.repo.list(filter).await
    }

    pub async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        self.repo.list(&EntityFilter::all()).await
    }

    pub async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Location>, RepoError> {
        self.repo.list(&EntityFilter::ids(ids.iter().cloned())).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Location>, RepoError> {
        let location = self.repo.get(id).await?;
        if location.is_none() {
            tracing::warn!(location_id = %id, "Location not found");
        }
        Ok(location)
    }

    pub async fn save(&self, location: &Location) -> Result<(), RepoError> {
        self.repo.save(location).await
    }

    /// Not atomic: a failure leaves earlier saves in place.
    pub async fn save_many(&self, locations: &[Location]) -> Result<(), RepoError> {
        for location in locations {
            self.repo.save(location).await?;
        }
        Ok(())
    }
}
