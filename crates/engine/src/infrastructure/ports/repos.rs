//! Repository port traits for world storage.
//!
//! One port per record kind. Implementations read and write storage on every
//! call; nothing is cached, and there is no locking between writers.

use async_trait::async_trait;
use worldsim_domain::{Character, Location, Relation};

use super::error::RepoError;

// =============================================================================
// Record Keys
// =============================================================================

/// Separator between the endpoint ids in a relation's key.
pub const RELATION_KEY_SEPARATOR: &str = "--";

/// Check that `key` can identify a record in every store.
///
/// Keys end up as file names, so they must be non-empty, contain no path
/// separators and not be `.` or `..`.
pub fn validate_record_key(key: &str) -> Result<(), RepoError> {
    let escapes = key.contains('/') || key.contains('\\') || key == "." || key == "..";
    if key.is_empty() || escapes {
        return Err(RepoError::invalid_key(key));
    }
    Ok(())
}

/// The joined key for the ordered pair `(x, y)`.
///
/// Endpoints may not contain [`RELATION_KEY_SEPARATOR`], so two different
/// pairs never share a key.
pub fn relation_key(x_node_id: &str, y_node_id: &str) -> Result<String, RepoError> {
    for id in [x_node_id, y_node_id] {
        validate_record_key(id)?;
        if id.contains(RELATION_KEY_SEPARATOR) {
            return Err(RepoError::invalid_key(id));
        }
    }
    Ok(format!("{x_node_id}{RELATION_KEY_SEPARATOR}{y_node_id}"))
}

// =============================================================================
// Filters
// =============================================================================

/// Set-membership filter for listing characters or locations.
///
/// Both filters are optional; when both are present a record must satisfy
/// both. Filtering preserves the order records were loaded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    pub id_in: Option<Vec<String>>,
    pub name_in: Option<Vec<String>>,
}

impl EntityFilter {
    /// Match every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match records whose id is one of `ids`.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_in: Some(ids.into_iter().map(Into::into).collect()),
            name_in: None,
        }
    }

    /// Match records whose name is one of `names`.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_in: None,
            name_in: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn matches(&self, id: &str, name: &str) -> bool {
        let id_ok = self
            .id_in
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|i| i == id));
        let name_ok = self
            .name_in
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name));
        id_ok && name_ok
    }
}

/// Filter for listing relations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationFilter {
    pub x_node_id_eq: Option<String>,
}

impl RelationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Match relations whose X node is `id`.
    pub fn from_node(id: impl Into<String>) -> Self {
        Self {
            x_node_id_eq: Some(id.into()),
        }
    }

    pub fn matches(&self, relation: &Relation) -> bool {
        self.x_node_id_eq
            .as_ref()
            .map_or(true, |x| *x == relation.x_node_id)
    }
}

// =============================================================================
// Database Ports (one per record kind)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Character>, RepoError>;
    /// `Ok(None)` when no record carries this id.
    async fn get(&self, id: &str) -> Result<Option<Character>, RepoError>;
    /// Upsert by id, overwriting any prior content.
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepo: Send + Sync {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Location>, RepoError>;
    /// `Ok(None)` when no record carries this id.
    async fn get(&self, id: &str) -> Result<Option<Location>, RepoError>;
    /// Upsert by id, overwriting any prior content.
    async fn save(&self, location: &Location) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepo: Send + Sync {
    async fn list(&self, filter: &RelationFilter) -> Result<Vec<Relation>, RepoError>;
    /// `Ok(None)` when no relation is keyed by this ordered pair.
    async fn get(&self, x_node_id: &str, y_node_id: &str) -> Result<Option<Relation>, RepoError>;
    /// Upsert by `(x_node_id, y_node_id)`, overwriting any prior content.
    async fn save(&self, relation: &Relation) -> Result<(), RepoError>;
}
