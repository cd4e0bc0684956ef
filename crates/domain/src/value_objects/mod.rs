//! Derived views over the stored world. Nothing here is persisted.

mod new_elements;
mod orbit;

pub use new_elements::NewElementsAnalysis;
pub use orbit::CharacterOrbit;
