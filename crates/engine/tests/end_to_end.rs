//! Full round against the JSON-file store with scripted LLM backends.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use worldsim_domain::Character;
use worldsim_engine::app::{App, Collaborators, Repositories};
use worldsim_engine::infrastructure::journal::MemoryJournal;
use worldsim_engine::infrastructure::json_files::JsonRepositories;
use worldsim_engine::infrastructure::ports::{
    CharacterRepo, EntityFilter, LlmError, LlmPort, LlmRequest, LlmResponse, RandomPort,
};
use worldsim_engine::use_cases::RoundSettings;

/// Answers every request with the next canned reply and keeps the requests.
struct ScriptedLlm {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().expect("lock").push(request);
        self.replies
            .lock()
            .expect("lock")
            .pop()
            .map(LlmResponse::text)
            .ok_or_else(|| LlmError::RequestFailed("script exhausted".into()))
    }
}

/// Always picks the first character.
struct FirstPick;

impl RandomPort for FirstPick {
    fn gen_index(&self, _upper: usize) -> usize {
        0
    }
}

const VIGNETTE: &str = "At dawn Mira hires Jonah Reyes, a ferry pilot with a shady past, \
to smuggle lamp oil across the bay before the rain.";

const ANALYSIS: &str = r#"```json
{
  "new_characters": [
    {"id": "JonahReyes", "name": "Jonah Reyes", "description": "Ferry pilot with a shady past"}
  ],
  "new_locations": [],
  "new_relations": [
    {"x_node_id": "mira", "x_node_type": "character",
     "y_node_id": "JonahReyes", "y_node_type": "character",
     "description": "Hired him to smuggle lamp oil", "importance": 4}
  ],
  "features_existing_characters": [
    {"id": "mira", "name": "Mira", "description": "Harbor master of Saltreach"}
  ]
}
```"#;

#[tokio::test]
async fn new_character_from_vignette_lands_on_disk() {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let repos = JsonRepositories::open(data_dir.path()).await.expect("open");
    repos
        .character
        .save(&Character::new("Mira", "Harbor master of Saltreach"))
        .await
        .expect("seed");

    let director = Arc::new(ScriptedLlm::new(&[VIGNETTE]));
    let archivist = Arc::new(ScriptedLlm::new(&[ANALYSIS]));
    let journal = Arc::new(MemoryJournal::new());

    let app = App::new(
        Repositories::json(repos),
        Collaborators {
            director: director.clone(),
            archivist: archivist.clone(),
        },
        Arc::new(FirstPick),
        journal.clone(),
        RoundSettings {
            rounds: 1,
            characters_per_round: 1,
        },
    );

    let summaries = app.use_cases.rounds.play_rounds().await.expect("run");

    assert_eq!(director.request_count(), 1);
    assert_eq!(archivist.request_count(), 1);

    let development = &summaries[0].developments[0];
    assert_eq!(development.character.character.id, "mira");
    assert_eq!(development.vignette, VIGNETTE);

    let jonah_path = data_dir.path().join("characters").join("jonah_reyes.json");
    let jonah: Character =
        serde_json::from_slice(&std::fs::read(&jonah_path).expect("jonah_reyes.json written"))
            .expect("valid record");
    assert_eq!(jonah.id, "jonah_reyes");
    assert_eq!(jonah.name, "Jonah Reyes");

    assert!(data_dir
        .path()
        .join("relations")
        .join("mira--jonah_reyes.json")
        .is_file());

    let characters = app
        .repositories
        .character
        .list(&EntityFilter::all())
        .await
        .expect("list");
    assert_eq!(characters.len(), 2);

    assert!(journal.contains("New characters detected!\n- **Jonah Reyes**"));
    assert!(journal.contains("### COMPLETED ROUND: 1"));
}
