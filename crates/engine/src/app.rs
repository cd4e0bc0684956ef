//! Application state and composition.

use std::sync::Arc;

use crate::entities::{Characters, Locations, Relations};
use crate::infrastructure::{
    json_files::JsonRepositories,
    memory_store::InMemoryWorldStore,
    ports::{CharacterRepo, JournalPort, LlmPort, LocationRepo, RandomPort, RelationRepo},
};
use crate::use_cases::{Archivist, Director, OrbitAssembler, RoundOrchestrator, RoundSettings};

/// Main application state.
///
/// Holds the repository ports, the entity wrappers built on them, and the
/// use cases.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub journal: Arc<dyn JournalPort>,
}

/// Container for the world-store ports.
#[derive(Clone)]
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub location: Arc<dyn LocationRepo>,
    pub relation: Arc<dyn RelationRepo>,
}

impl Repositories {
    pub fn json(repos: JsonRepositories) -> Self {
        Self {
            character: repos.character,
            location: repos.location,
            relation: repos.relation,
        }
    }

    pub fn in_memory(store: Arc<InMemoryWorldStore>) -> Self {
        Self {
            character: store.clone(),
            location: store.clone(),
            relation: store,
        }
    }
}

/// LLM backends for the two actors. They may share one client.
pub struct Collaborators {
    pub director: Arc<dyn LlmPort>,
    pub archivist: Arc<dyn LlmPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub orbit: Arc<OrbitAssembler>,
    pub director: Arc<Director>,
    pub archivist: Arc<Archivist>,
    pub rounds: Arc<RoundOrchestrator>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repositories: Repositories,
        llms: Collaborators,
        random: Arc<dyn RandomPort>,
        journal: Arc<dyn JournalPort>,
        settings: RoundSettings,
    ) -> Self {
        let characters = Arc::new(Characters::new(repositories.character.clone()));
        let locations = Arc::new(Locations::new(repositories.location.clone()));
        let relations = Arc::new(Relations::new(repositories.relation.clone()));

        let orbit = Arc::new(OrbitAssembler::new(
            characters.clone(),
            locations.clone(),
            relations.clone(),
        ));
        let director = Arc::new(Director::new(llms.director, journal.clone()));
        let archivist = Arc::new(Archivist::new(
            characters.clone(),
            locations.clone(),
            relations.clone(),
            llms.archivist,
            journal.clone(),
        ));
        let rounds = Arc::new(RoundOrchestrator::new(
            characters,
            locations,
            relations,
            orbit.clone(),
            director.clone(),
            archivist.clone(),
            random,
            journal.clone(),
            settings,
        ));

        Self {
            repositories,
            use_cases: UseCases {
                orbit,
                director,
                archivist,
                rounds,
            },
            journal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::journal::MemoryJournal;
    use crate::infrastructure::ports::{LlmResponse, MockLlmPort, MockRandomPort};
    use worldsim_domain::Character;

    #[tokio::test]
    async fn director_and_archivist_use_their_own_backends() {
        let mut director = MockLlmPort::new();
        director
            .expect_generate()
            .times(1)
            .returning(|_| Ok(LlmResponse::text("Mira counts the gulls.")));
        let mut archivist = MockLlmPort::new();
        archivist.expect_generate().times(1).returning(|_| {
            Ok(LlmResponse::text(
                r#"{"new_characters": [], "new_locations": [], "new_relations": []}"#,
            ))
        });
        let mut random = MockRandomPort::new();
        random.expect_gen_index().returning(|_| 0);

        let store = InMemoryWorldStore::seeded([Character::new("Mira", "Harbor master")], [], []);
        let app = App::new(
            Repositories::in_memory(store),
            Collaborators {
                director: Arc::new(director),
                archivist: Arc::new(archivist),
            },
            Arc::new(random),
            Arc::new(MemoryJournal::new()),
            RoundSettings {
                rounds: 1,
                characters_per_round: 1,
            },
        );

        let summaries = app.use_cases.rounds.play_rounds().await.expect("rounds");
        assert_eq!(summaries[0].developments[0].vignette, "Mira counts the gulls.");
    }
}
