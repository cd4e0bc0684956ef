//! JSON-file location repository.

use async_trait::async_trait;
use worldsim_domain::Location;

use super::helpers::JsonDirectory;
use crate::infrastructure::ports::{EntityFilter, LocationRepo, RepoError};

/// Locations stored as `locations/{id}.json`.
pub struct JsonLocationRepo {
    dir: JsonDirectory,
}

impl JsonLocationRepo {
    pub(super) fn new(dir: JsonDirectory) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl LocationRepo for JsonLocationRepo {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Location>, RepoError> {
        let locations: Vec<Location> = self.dir.load_all().await?;
        Ok(locations
            .into_iter()
            .filter(|l| filter.matches(&l.id, &l.name))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, RepoError> {
        self.dir.load(id).await
    }

    async fn save(&self, location: &Location) -> Result<(), RepoError> {
        self.dir.store(&location.id, location).await
    }
}
