//! JSON-file world storage.
//!
//! Layout under the data directory:
//!
//! ```text
//! characters/{id}.json
//! locations/{id}.json
//! relations/{x_node_id}--{y_node_id}.json
//! ```
//!
//! Each save is an independent whole-file overwrite. There is no locking, so
//! concurrent writers race and the last write to a key wins.

use std::path::Path;
use std::sync::Arc;

use crate::infrastructure::ports::RepoError;

mod helpers;

mod character_repo;
mod location_repo;
mod relation_repo;

pub use character_repo::JsonCharacterRepo;
pub use location_repo::JsonLocationRepo;
pub use relation_repo::JsonRelationRepo;

use helpers::JsonDirectory;

pub const CHARACTER_DIR: &str = "characters";
pub const LOCATION_DIR: &str = "locations";
pub const RELATION_DIR: &str = "relations";

/// All JSON-file repositories rooted at one data directory.
pub struct JsonRepositories {
    pub character: Arc<JsonCharacterRepo>,
    pub location: Arc<JsonLocationRepo>,
    pub relation: Arc<JsonRelationRepo>,
}

impl JsonRepositories {
    /// Open (creating if needed) the record directories under `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, RepoError> {
        let data_dir = data_dir.as_ref();
        let characters = JsonDirectory::new(data_dir.join(CHARACTER_DIR), "character");
        let locations = JsonDirectory::new(data_dir.join(LOCATION_DIR), "location");
        let relations = JsonDirectory::new(data_dir.join(RELATION_DIR), "relation");

        for dir in [&characters, &locations, &relations] {
            dir.ensure_exists().await?;
        }
        tracing::info!(data_dir = %data_dir.display(), "Opened JSON world store");

        Ok(Self {
            character: Arc::new(JsonCharacterRepo::new(characters)),
            location: Arc::new(JsonLocationRepo::new(locations)),
            relation: Arc::new(JsonRelationRepo::new(relations)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use worldsim_domain::{Character, Location, NodeType, Relation};

    use super::*;
    use crate::infrastructure::ports::{
        CharacterRepo, EntityFilter, LocationRepo, RelationFilter, RelationRepo,
    };

    async fn open_temp() -> (tempfile::TempDir, JsonRepositories) {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = JsonRepositories::open(temp_dir.path())
            .await
            .expect("open store");
        (temp_dir, repos)
    }

    #[tokio::test]
    async fn open_creates_record_directories() {
        let (temp_dir, _repos) = open_temp().await;
        for dir in [CHARACTER_DIR, LOCATION_DIR, RELATION_DIR] {
            assert!(temp_dir.path().join(dir).is_dir(), "missing {dir}");
        }
    }

    #[tokio::test]
    async fn character_round_trips_through_its_own_file() {
        let (temp_dir, repos) = open_temp().await;
        let mira = Character::new("Mira", "Harbor master of Saltreach");

        repos.character.save(&mira).await.expect("save");

        let path = temp_dir.path().join(CHARACTER_DIR).join("mira.json");
        let text = std::fs::read_to_string(path).expect("file written");
        assert!(text.contains("\n    \"name\": \"Mira\""));

        let loaded = repos.character.get("mira").await.expect("get");
        assert_eq!(loaded, Some(mira));
    }

    #[tokio::test]
    async fn get_missing_record_is_none() {
        let (_temp_dir, repos) = open_temp().await;
        assert_eq!(repos.character.get("nobody").await.expect("get"), None);
        assert_eq!(repos.location.get("nowhere").await.expect("get"), None);
        assert_eq!(repos.relation.get("a", "b").await.expect("get"), None);
    }

    #[tokio::test]
    async fn save_overwrites_prior_content() {
        let (_temp_dir, repos) = open_temp().await;
        repos
            .location
            .save(&Location::new("Saltreach Harbor", "Busy docks"))
            .await
            .expect("save");
        let rewritten = Location::new("Saltreach Harbor", "Abandoned after the storm");
        repos.location.save(&rewritten).await.expect("save again");

        let all = repos.location.list(&EntityFilter::all()).await.expect("list");
        assert_eq!(all, vec![rewritten]);
    }

    #[tokio::test]
    async fn list_filters_by_id_set_regardless_of_store_size() {
        let (_temp_dir, repos) = open_temp().await;
        for name in ["Ada", "Bram", "Cato", "Dina", "Esme", "Fenn"] {
            repos
                .character
                .save(&Character::new(name, "villager"))
                .await
                .expect("save");
        }

        let found = repos
            .character
            .list(&EntityFilter::ids(["bram", "esme"]))
            .await
            .expect("list");

        let ids: BTreeSet<_> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, BTreeSet::from(["bram", "esme"]));
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_name_set() {
        let (_temp_dir, repos) = open_temp().await;
        repos
            .location
            .save(&Location::new("Old Mill", "Creaky"))
            .await
            .expect("save");
        repos
            .location
            .save(&Location::new("Lighthouse", "Tall"))
            .await
            .expect("save");

        let found = repos
            .location
            .list(&EntityFilter::names(["Lighthouse"]))
            .await
            .expect("list");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "lighthouse");
    }

    #[tokio::test]
    async fn relations_are_keyed_by_ordered_pair() {
        let (temp_dir, repos) = open_temp().await;
        let forward = Relation::new(
            NodeType::Character,
            "mira",
            NodeType::Character,
            "jonah_reyes",
            "Trusts him with the ferry",
        );
        let backward = Relation::new(
            NodeType::Character,
            "jonah_reyes",
            NodeType::Character,
            "mira",
            "Owes her a favor",
        );
        repos.relation.save(&forward).await.expect("save");
        repos.relation.save(&backward).await.expect("save");

        assert!(temp_dir
            .path()
            .join(RELATION_DIR)
            .join("mira--jonah_reyes.json")
            .is_file());
        assert_eq!(
            repos.relation.get("jonah_reyes", "mira").await.expect("get"),
            Some(backward)
        );

        let from_mira = repos
            .relation
            .list(&RelationFilter::from_node("mira"))
            .await
            .expect("list");
        assert_eq!(from_mira, vec![forward]);
    }

    #[tokio::test]
    async fn malformed_record_is_a_serialization_error() {
        let (temp_dir, repos) = open_temp().await;
        std::fs::write(
            temp_dir.path().join(CHARACTER_DIR).join("broken.json"),
            "{\"id\": \"broken\"}",
        )
        .expect("write");

        let err = repos
            .character
            .list(&EntityFilter::all())
            .await
            .expect_err("malformed record must fail");
        assert!(matches!(err, RepoError::Serialization(msg) if msg.contains("broken.json")));
    }

    #[tokio::test]
    async fn non_json_files_are_ignored() {
        let (temp_dir, repos) = open_temp().await;
        std::fs::write(temp_dir.path().join(CHARACTER_DIR).join("notes.txt"), "x")
            .expect("write");
        assert!(repos
            .character
            .list(&EntityFilter::all())
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn empty_id_is_rejected_before_touching_disk() {
        let (_temp_dir, repos) = open_temp().await;
        let nameless = Character::new("?!", "Punctuation only");
        assert_eq!(nameless.id, "");

        let err = repos
            .character
            .save(&nameless)
            .await
            .expect_err("empty key");
        assert!(matches!(err, RepoError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn relation_endpoints_containing_the_separator_are_rejected() {
        let (temp_dir, repos) = open_temp().await;
        let left = Relation::new(NodeType::Character, "a--b", NodeType::Character, "c", "First");
        let right = Relation::new(NodeType::Character, "a", NodeType::Character, "b--c", "Second");

        for relation in [&left, &right] {
            let err = repos.relation.save(relation).await.expect_err("ambiguous key");
            assert!(matches!(err, RepoError::InvalidKey(_)));
        }
        assert!(matches!(
            repos.relation.get("a--b", "c").await,
            Err(RepoError::InvalidKey(_))
        ));
        assert!(!temp_dir.path().join(RELATION_DIR).join("a--b--c.json").exists());
    }
}
