//! Use cases - simulation orchestration.
//!
//! Use cases orchestrate across entity modules and LLM actors to advance the
//! world one round at a time.

pub mod digest;
pub mod narrative;
pub mod orbit;
pub mod rounds;
pub mod upkeep;

pub use narrative::{Director, NarrativeError};
pub use orbit::OrbitAssembler;
pub use rounds::{CharacterDevelopment, RoundError, RoundOrchestrator, RoundSettings, RoundSummary};
pub use upkeep::{Archivist, UpkeepError};
