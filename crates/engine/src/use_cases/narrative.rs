//! Vignette narration use case.

use std::sync::Arc;

use worldsim_domain::CharacterOrbit;

use crate::infrastructure::actor::LlmActor;
use crate::infrastructure::ports::{JournalLevel, JournalPort, LlmError, LlmPort};
use crate::use_cases::digest;

pub const DIRECTOR_NAME: &str = "FearlessDirector";

pub const DIRECTOR_SYSTEM_PROMPT: &str = "You are a creative mastermind building a world and designing and directing the characters within it.

You thrive on creativity and a bit of spice, but also feel strongly that worlds should make sense and be realistic, pragmatic, and fleshed out to be as whole as possible. The little details (who provides the services that make the settlement work, what are those services, where do people eat, drink, and live -- e.g. where does the wife of the night janitor for the space port go to buy coffee and donuts, and who is the barista's childhood friend? (NOTE: these are examples, not instructions)) matter as much as the grand stories (major crises or events). In other words, the NPCs and their lives, locations, and relations, matter as much as the protagonists of the story.";

/// Context shared by every vignette of a day.
pub const DAILY_INFO_HOOK: &str = "## DAY 12
It is a typical tuesday. There is a chance of rain in the afternoon.";

pub const VIGNETTE_QUERY: &str =
    "Write a very short plot synopsis of an interesting episode in which this character appears";

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("Director failed: {0}")]
    Llm(#[from] LlmError),
    #[error("Director returned an empty vignette for {0}")]
    EmptyVignette(String),
}

/// Narrates one vignette per character.
///
/// Each call uses a fresh actor so one character's story never leaks into
/// the next.
pub struct Director {
    llm: Arc<dyn LlmPort>,
    journal: Arc<dyn JournalPort>,
}

impl Director {
    pub fn new(llm: Arc<dyn LlmPort>, journal: Arc<dyn JournalPort>) -> Self {
        Self { llm, journal }
    }

    pub async fn write_vignette(&self, orbit: &CharacterOrbit) -> Result<String, NarrativeError> {
        let name = &orbit.character.name;
        let mut director = LlmActor::new(DIRECTOR_NAME, self.llm.clone(), DIRECTOR_SYSTEM_PROMPT);

        director.observe(DAILY_INFO_HOOK);
        director.observe(format!("We turn our attention to the story of {name}"));
        director.observe(digest::orbit(orbit));

        let reply = director.query(VIGNETTE_QUERY, None).await?;
        let truncated = reply.is_truncated();
        let vignette = reply.response.into_text();
        if vignette.trim().is_empty() {
            return Err(NarrativeError::EmptyVignette(name.clone()));
        }
        if truncated {
            tracing::warn!(character_id = %orbit.character.id, "Vignette hit the token limit");
            self.journal.record(
                JournalLevel::Warning,
                &format!("Vignette for **{name}** hit the token limit and may be cut short."),
            );
        }

        tracing::info!(character_id = %orbit.character.id, chars = vignette.len(), "Director generated vignette");
        self.journal
            .info(&format!("#### Director generated new vignette!\n{vignette}"));
        Ok(vignette)
    }
}
