//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - World storage (JSON files on disk, or memory in tests)
//! - LLM calls (any OpenAI-compatible chat-completions endpoint)
//! - The run journal (markdown file)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    relation_key, validate_record_key, CharacterRepo, EntityFilter, LocationRepo, RelationFilter,
    RelationRepo, RELATION_KEY_SEPARATOR,
};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, JournalLevel, JournalPort, LlmPort, LlmRequest, LlmResponse,
    MessageRole, ResponseFormat, TokenUsage,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockLlmPort;

#[cfg(test)]
pub use repos::{MockCharacterRepo, MockLocationRepo, MockRelationRepo};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LlmError, RepoError};
