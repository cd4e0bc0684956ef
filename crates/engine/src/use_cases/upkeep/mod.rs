//! World upkeep use case.
//!
//! After each vignette the archivist compares the story against the catalogue
//! and reports new characters, locations and relations. Proposals are
//! normalized (see [`merge`]) and persisted in dependency order: characters,
//! then locations, then relations. Nothing is ever deleted, and catalogued
//! records are never rewritten.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use worldsim_domain::NewElementsAnalysis;

use crate::entities::{Characters, Locations, Relations};
use crate::infrastructure::actor::{LlmActor, QueryResponse};
use crate::infrastructure::ports::{JournalLevel, JournalPort, LlmError, LlmPort, RepoError};
use crate::use_cases::digest;

pub mod merge;
mod schema;

pub use merge::IdRemapping;
pub use schema::{new_elements_shape, NEW_ELEMENTS_SHAPE};

pub const ARCHIVIST_NAME: &str = "ArchivistEditor";

pub const ARCHIVIST_SYSTEM_PROMPT: &str = "You are an archivist trying to keep up a database directory of information about characters, locations, relations, etc. in a fictional world. Your job is to review new vignettes written by the creative director, log any new elements, and give feedback when new elements conflict with existing ones.";

pub const NEW_ELEMENTS_QUERY: &str = "Did any new characters, locations, or relations that are not catalogued in the directory yet appear in the latest vignette? If so please format what we know about them for the directory. If the character does not have a full name, please create one for them, using a similar style to existing names.";

#[derive(Debug, thiserror::Error)]
pub enum UpkeepError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Archivist failed: {0}")]
    Llm(#[from] LlmError),
    #[error("Archivist answer could not be read as NewElementsAnalysis: {reason}")]
    Extraction { reason: String, raw: String },
    #[error("Failed to render catalogue: {0}")]
    Render(#[from] serde_json::Error),
}

/// Extracts new world elements from vignettes and files them.
pub struct Archivist {
    characters: Arc<Characters>,
    locations: Arc<Locations>,
    relations: Arc<Relations>,
    llm: Arc<dyn LlmPort>,
    journal: Arc<dyn JournalPort>,
}

impl Archivist {
    pub fn new(
        characters: Arc<Characters>,
        locations: Arc<Locations>,
        relations: Arc<Relations>,
        llm: Arc<dyn LlmPort>,
        journal: Arc<dyn JournalPort>,
    ) -> Self {
        Self {
            characters,
            locations,
            relations,
            llm,
            journal,
        }
    }

    /// Run one upkeep pass over `vignette` and persist what is new.
    ///
    /// Returns the normalized analysis. Proposals the catalogue already holds
    /// are moved to the matching `features_existing_*` list.
    pub async fn check_for_new_elements(
        &self,
        vignette: &str,
    ) -> Result<NewElementsAnalysis, UpkeepError> {
        self.journal
            .info("### Checking story vignette for new world elements...");

        let existing_characters = self.characters.list_all().await?;
        let existing_locations = self.locations.list_all().await?;
        let existing_relations = self.relations.list_all().await?;

        let mut archivist = LlmActor::new(ARCHIVIST_NAME, self.llm.clone(), ARCHIVIST_SYSTEM_PROMPT);
        archivist.observe(section("EXISTING_CHARACTER_LIST", &existing_characters)?);
        archivist.observe(section("EXISTING_LOCATION_LIST", &existing_locations)?);
        archivist.observe(section("EXISTING_RELATIONS_LIST", &existing_relations)?);
        archivist.observe(format!("## NEW_STORY_VIGNETTE\n{vignette}"));

        let answer = archivist
            .query(NEW_ELEMENTS_QUERY, Some(&new_elements_shape()))
            .await?;
        let mut analysis = decode_analysis(answer.response)?;
        tracing::debug!(?analysis, "new_elements_check_results");
        self.journal.record(
            JournalLevel::Debug,
            &format!("new_elements_check_results\n{analysis:?}"),
        );

        // Normalize every proposal before touching relations so the
        // remapping covers all renamed nodes.
        let mut remapping = IdRemapping::new();
        merge::normalize_ids(&mut analysis.new_characters, &mut remapping);
        merge::normalize_ids(&mut analysis.new_locations, &mut remapping);
        let rewritten = merge::remap_relation_endpoints(&mut analysis.new_relations, &remapping);
        if rewritten > 0 {
            tracing::debug!(rewritten, "Rewrote relation endpoints to canonical ids");
        }

        let character_ids: HashSet<String> =
            existing_characters.into_iter().map(|c| c.id).collect();
        let (new_characters, known) = merge::partition_new_entities(
            std::mem::take(&mut analysis.new_characters),
            &character_ids,
        );
        analysis.new_characters = new_characters;
        analysis.features_existing_characters.extend(known);

        let location_ids: HashSet<String> = existing_locations.into_iter().map(|l| l.id).collect();
        let (new_locations, known) = merge::partition_new_entities(
            std::mem::take(&mut analysis.new_locations),
            &location_ids,
        );
        analysis.new_locations = new_locations;
        analysis.features_existing_locations.extend(known);

        let relation_keys: HashSet<(String, String)> = existing_relations
            .into_iter()
            .map(|r| (r.x_node_id, r.y_node_id))
            .collect();
        let (new_relations, known) = merge::partition_new_relations(
            std::mem::take(&mut analysis.new_relations),
            &relation_keys,
        );
        analysis.new_relations = new_relations;
        analysis.features_existing_relations.extend(known);

        self.persist(&analysis).await?;

        tracing::info!(
            new_characters = analysis.new_characters.len(),
            new_locations = analysis.new_locations.len(),
            new_relations = analysis.new_relations.len(),
            remapped_ids = remapping.len(),
            "Upkeep pass complete"
        );
        Ok(analysis)
    }

    async fn persist(&self, analysis: &NewElementsAnalysis) -> Result<(), UpkeepError> {
        if analysis.new_characters.is_empty() {
            self.journal.info("No new characters detected.");
        } else {
            self.journal.info(&format!(
                "New characters detected!\n{}",
                digest::character_list(&analysis.new_characters)
            ));
            self.characters.save_many(&analysis.new_characters).await?;
        }

        if analysis.new_locations.is_empty() {
            self.journal.info("No new locations detected.");
        } else {
            self.journal.info(&format!(
                "New locations detected!\n{}",
                digest::location_list(&analysis.new_locations)
            ));
            self.locations.save_many(&analysis.new_locations).await?;
        }

        if analysis.new_relations.is_empty() {
            self.journal.info("No new relations detected.");
        } else {
            // Endpoints are not checked against the catalogue.
            for relation in &analysis.new_relations {
                tracing::debug!(
                    x_node_id = %relation.x_node_id,
                    y_node_id = %relation.y_node_id,
                    "Saving relation without endpoint validation"
                );
            }
            self.journal.info(&format!(
                "New relations detected!\n{}",
                digest::relation_list(&analysis.new_relations)
            ));
            self.relations.save_many(&analysis.new_relations).await?;
        }
        Ok(())
    }
}

fn section<T: Serialize>(title: &str, records: &[T]) -> Result<String, serde_json::Error> {
    Ok(format!("## {title}\n{}", serde_json::to_string_pretty(records)?))
}

fn decode_analysis(answer: QueryResponse) -> Result<NewElementsAnalysis, UpkeepError> {
    match answer {
        QueryResponse::Structured(value) => {
            let raw = value.to_string();
            serde_json::from_value(value).map_err(|e| UpkeepError::Extraction {
                reason: e.to_string(),
                raw,
            })
        }
        QueryResponse::ExtractionFailed { raw, reason } => {
            Err(UpkeepError::Extraction { reason, raw })
        }
        QueryResponse::Text(raw) => Err(UpkeepError::Extraction {
            reason: "expected a structured answer".to_string(),
            raw,
        }),
    }
}
