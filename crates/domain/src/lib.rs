//! worldsim Domain - the records that make up a simulated world.
//!
//! ## Structure
//!
//! - `entities/` - Persisted records: characters, locations, relations
//! - `value_objects/` - Derived, non-persisted views (orbits, upkeep analyses)
//! - `slug` - Canonical identifier derivation
//! - `error` - Domain error type

pub mod entities;
pub mod error;
pub mod slug;
pub mod value_objects;

pub use entities::{Character, Location, NamedEntity, NodeType, Relation};
pub use error::DomainError;
pub use slug::slugify;
pub use value_objects::{CharacterOrbit, NewElementsAnalysis};
