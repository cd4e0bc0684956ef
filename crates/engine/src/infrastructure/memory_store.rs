//! In-memory world store for development and testing
//!
//! Same contract as the JSON-file store, but nothing is persisted. Records
//! are kept in key order so listing is deterministic.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use worldsim_domain::{Character, Location, Relation};

use crate::infrastructure::ports::{
    relation_key, validate_record_key, CharacterRepo, EntityFilter, LocationRepo, RelationFilter,
    RelationRepo, RepoError,
};

/// In-memory character, location and relation tables.
#[derive(Default)]
pub struct InMemoryWorldStore {
    characters: RwLock<BTreeMap<String, Character>>,
    locations: RwLock<BTreeMap<String, Location>>,
    relations: RwLock<BTreeMap<(String, String), Relation>>,
}

impl InMemoryWorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given records.
    pub fn seeded(
        characters: impl IntoIterator<Item = Character>,
        locations: impl IntoIterator<Item = Location>,
        relations: impl IntoIterator<Item = Relation>,
    ) -> Arc<Self> {
        let characters = characters.into_iter().map(|c| (c.id.clone(), c)).collect();
        let locations = locations.into_iter().map(|l| (l.id.clone(), l)).collect();
        let relations = relations
            .into_iter()
            .map(|r| ((r.x_node_id.clone(), r.y_node_id.clone()), r))
            .collect();
        Arc::new(Self {
            characters: RwLock::new(characters),
            locations: RwLock::new(locations),
            relations: RwLock::new(relations),
        })
    }

    /// Total number of records of every kind.
    pub async fn record_count(&self) -> usize {
        self.characters.read().await.len()
            + self.locations.read().await.len()
            + self.relations.read().await.len()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryWorldStore {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Character>, RepoError> {
        let characters = self.characters.read().await;
        Ok(characters
            .values()
            .filter(|c| filter.matches(&c.id, &c.name))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Character>, RepoError> {
        validate_record_key(id)?;
        Ok(self.characters.read().await.get(id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        validate_record_key(&character.id)?;
        self.characters
            .write()
            .await
            .insert(character.id.clone(), character.clone());
        Ok(())
    }
}

#[async_trait]
impl LocationRepo for InMemoryWorldStore {
    async fn list(&self, filter: &EntityFilter) -> Result<Vec<Location>, RepoError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .filter(|l| filter.matches(&l.id, &l.name))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, RepoError> {
        validate_record_key(id)?;
        Ok(self.locations.read().await.get(id).cloned())
    }

    async fn save(&self, location: &Location) -> Result<(), RepoError> {
        validate_record_key(&location.id)?;
        self.locations
            .write()
            .await
            .insert(location.id.clone(), location.clone());
        Ok(())
    }
}

#[async_trait]
impl RelationRepo for InMemoryWorldStore {
    async fn list(&self, filter: &RelationFilter) -> Result<Vec<Relation>, RepoError> {
        let relations = self.relations.read().await;
        Ok(relations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get(&self, x_node_id: &str, y_node_id: &str) -> Result<Option<Relation>, RepoError> {
        relation_key(x_node_id, y_node_id)?;
        let key = (x_node_id.to_string(), y_node_id.to_string());
        Ok(self.relations.read().await.get(&key).cloned())
    }

    async fn save(&self, relation: &Relation) -> Result<(), RepoError> {
        relation_key(&relation.x_node_id, &relation.y_node_id)?;
        let key = (relation.x_node_id.clone(), relation.y_node_id.clone());
        self.relations.write().await.insert(key, relation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldsim_domain::NodeType;

    #[tokio::test]
    async fn listing_is_ordered_by_key() {
        let store = InMemoryWorldStore::seeded(
            [
                Character::new("Zed", "last"),
                Character::new("Ada", "first"),
                Character::new("Mira", "middle"),
            ],
            [],
            [],
        );

        let ids: Vec<_> = CharacterRepo::list(store.as_ref(), &EntityFilter::all())
            .await
            .expect("list")
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["ada", "mira", "zed"]);
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryWorldStore::new();
        let harbor = Location::new("Saltreach Harbor", "Gulls and tar");
        LocationRepo::save(&store, &harbor).await.expect("save");
        assert_eq!(
            LocationRepo::get(&store, "saltreach_harbor").await.expect("get"),
            Some(harbor)
        );
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn relation_save_overwrites_same_pair() {
        let store = InMemoryWorldStore::new();
        let first = Relation::new(
            NodeType::Character,
            "mira",
            NodeType::Location,
            "saltreach_harbor",
            "Works here",
        );
        let second = Relation::new(
            NodeType::Character,
            "mira",
            NodeType::Location,
            "saltreach_harbor",
            "Owns it now",
        );
        RelationRepo::save(&store, &first).await.expect("save");
        RelationRepo::save(&store, &second).await.expect("save");

        let all = RelationRepo::list(&store, &RelationFilter::all())
            .await
            .expect("list");
        assert_eq!(all, vec![second]);
    }

    #[tokio::test]
    async fn empty_keys_are_rejected() {
        let store = InMemoryWorldStore::new();
        let err = CharacterRepo::save(&store, &Character::new("...", "dots"))
            .await
            .expect_err("empty id");
        assert!(matches!(err, RepoError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn keys_follow_the_file_store_rules() {
        let store = InMemoryWorldStore::new();
        let joined = Relation::new(NodeType::Character, "a--b", NodeType::Character, "c", "Ambiguous");
        assert!(matches!(
            RelationRepo::save(&store, &joined).await,
            Err(RepoError::InvalidKey(id)) if id == "a--b"
        ));

        let mut pathy = Character::new("Mira", "Harbor master");
        pathy.id = "mira/../jonah".to_string();
        assert!(matches!(
            CharacterRepo::save(&store, &pathy).await,
            Err(RepoError::InvalidKey(_))
        ));
        assert!(matches!(
            LocationRepo::get(&store, "..").await,
            Err(RepoError::InvalidKey(_))
        ));
        assert_eq!(store.record_count().await, 0);
    }
}
