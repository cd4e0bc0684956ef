//! worldsim Engine library.
//!
//! Grows a small fictional world one round at a time: a director LLM narrates
//! vignettes about sampled characters and an archivist LLM files the new
//! characters, locations and relations they introduce.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping the repository ports
//! - `use_cases/` - Orbit assembly, narration, upkeep and the round loop
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Demo HTTP routes
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
