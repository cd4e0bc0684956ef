//! Persisted world records.
//!
//! Characters and locations are nodes keyed by their slug; relations are
//! directed edges keyed by the ordered pair of node ids.

mod character;
mod location;
mod relation;

pub use character::Character;
pub use location::Location;
pub use relation::{NodeType, Relation};

/// A node record whose identifier is derived from its display name.
pub trait NamedEntity {
    /// The node type this record occupies in a relation.
    const NODE_TYPE: NodeType;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// The id this record should carry, derived from its name.
    fn canonical_id(&self) -> String {
        crate::slugify(self.name())
    }
}
