//! Round orchestration use case.
//!
//! Each round samples characters with replacement, then for every pick:
//! assemble its orbit, have the director narrate a vignette, and have the
//! archivist file whatever the vignette introduced. Everything runs
//! sequentially and the first failure aborts the run.

use std::sync::Arc;

use serde::Serialize;
use worldsim_domain::{Character, CharacterOrbit, NewElementsAnalysis};

use crate::entities::{Characters, Locations, Relations};
use crate::infrastructure::ports::{JournalPort, RandomPort, RepoError};
use crate::use_cases::digest;
use crate::use_cases::narrative::{Director, NarrativeError};
use crate::use_cases::orbit::OrbitAssembler;
use crate::use_cases::upkeep::{Archivist, UpkeepError};

pub const DEFAULT_ROUNDS: u32 = 2;
pub const DEFAULT_CHARACTERS_PER_ROUND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub rounds: u32,
    /// Sample size per round. The same character may be picked repeatedly.
    pub characters_per_round: usize,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            characters_per_round: DEFAULT_CHARACTERS_PER_ROUND,
        }
    }
}

/// What one character's turn produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDevelopment {
    pub character: CharacterOrbit,
    pub vignette: String,
    pub analysis: NewElementsAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub developments: Vec<CharacterDevelopment>,
}

#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
    #[error(transparent)]
    Upkeep(#[from] UpkeepError),
    #[error("Failed to render round summary: {0}")]
    Render(#[from] serde_json::Error),
}

pub struct RoundOrchestrator {
    characters: Arc<Characters>,
    locations: Arc<Locations>,
    relations: Arc<Relations>,
    orbit: Arc<OrbitAssembler>,
    director: Arc<Director>,
    archivist: Arc<Archivist>,
    random: Arc<dyn RandomPort>,
    journal: Arc<dyn JournalPort>,
    settings: RoundSettings,
}

impl RoundOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        characters: Arc<Characters>,
        locations: Arc<Locations>,
        relations: Arc<Relations>,
        orbit: Arc<OrbitAssembler>,
        director: Arc<Director>,
        archivist: Arc<Archivist>,
        random: Arc<dyn RandomPort>,
        journal: Arc<dyn JournalPort>,
        settings: RoundSettings,
    ) -> Self {
        Self {
            characters,
            locations,
            relations,
            orbit,
            director,
            archivist,
            random,
            journal,
            settings,
        }
    }

    /// Play rounds `1..=settings.rounds`.
    pub async fn play_rounds(&self) -> Result<Vec<RoundSummary>, RoundError> {
        let mut summaries = Vec::new();
        for round in 1..=self.settings.rounds {
            tracing::info!(round, of = self.settings.rounds, "Beginning round");
            self.journal.info(&format!("## BEGINNING ROUND: {round}"));
            self.log_world_so_far().await?;

            let summary = self.play_round(round).await?;

            let results = serde_json::to_string_pretty(&summary.developments)?;
            self.journal.info(&format!(
                "### COMPLETED ROUND: {round}\nData results:\n```{results}```"
            ));
            tracing::info!(round, developments = summary.developments.len(), "Completed round");
            summaries.push(summary);
        }
        Ok(summaries)
    }

    pub async fn play_round(&self, round: u32) -> Result<RoundSummary, RoundError> {
        let characters = self.characters.list_all().await?;
        let selected = self.select_characters(&characters);
        if selected.is_empty() {
            tracing::warn!(round, "No characters to focus on this round");
        } else {
            self.journal.info(&format!(
                "Today will focus on these characters:\n{}",
                digest::character_list(&selected)
            ));
        }

        let mut developments = Vec::with_capacity(selected.len());
        for character in selected {
            developments.push(self.develop_character(&character).await?);
        }
        Ok(RoundSummary {
            round,
            developments,
        })
    }

    /// Sample `characters_per_round` characters with replacement.
    pub fn select_characters(&self, population: &[Character]) -> Vec<Character> {
        if population.is_empty() {
            return Vec::new();
        }
        (0..self.settings.characters_per_round)
            .map(|_| population[self.random.gen_index(population.len())].clone())
            .collect()
    }

    async fn develop_character(
        &self,
        character: &Character,
    ) -> Result<CharacterDevelopment, RoundError> {
        tracing::info!(character_id = %character.id, "Zooming in on character");
        self.journal
            .info(&format!("### Zooming in on character: **{}**", character.name));

        let orbit = self.orbit.get_character_orbit(character).await?;
        tracing::debug!(character_id = %character.id, relations = orbit.relations.len(), "Assembled orbit");

        let vignette = self.director.write_vignette(&orbit).await?;
        let analysis = self.archivist.check_for_new_elements(&vignette).await?;

        Ok(CharacterDevelopment {
            character: orbit,
            vignette,
            analysis,
        })
    }

    async fn log_world_so_far(&self) -> Result<(), RoundError> {
        let characters = self.characters.list_all().await?;
        let locations = self.locations.list_all().await?;
        let relations = self.relations.list_all().await?;

        self.journal.info("### The world so far:");
        for section in digest::world(&characters, &locations, &relations) {
            self.journal.info(&section);
        }
        Ok(())
    }

    /// Log every stored record before the first round.
    pub async fn dump_world(&self) -> Result<(), RoundError> {
        let characters = self.characters.list_all().await?;
        let locations = self.locations.list_all().await?;
        let relations = self.relations.list_all().await?;
        tracing::info!(
            characters = characters.len(),
            locations = locations.len(),
            relations = relations.len(),
            "Loaded world"
        );

        self.journal.info("## (DATA DUMP so far)");
        self.journal.info(&format!(
            "### CHARACTERS\n```\n{}\n```",
            serde_json::to_string_pretty(&characters)?
        ));
        self.journal.info(&format!(
            "### LOCATIONS\n```\n{}\n```",
            serde_json::to_string_pretty(&locations)?
        ));
        self.journal.info(&format!(
            "### RELATIONS\n```\n{}\n```",
            serde_json::to_string_pretty(&relations)?
        ));
        Ok(())
    }
}
