//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps the repository port for one record kind.
//! They are the building blocks for use cases.

pub mod character;
pub mod location;
pub mod relation;

pub use character::Characters;
pub use location::Locations;
pub use relation::Relations;
