//! Identifier normalization and reconciliation of model-proposed elements.
//!
//! The model invents ids for new elements and often gets the slug rule
//! wrong. Before anything is persisted every proposed node gets its
//! canonical id, relation endpoints that used the invented id are rewritten,
//! and proposals that would overwrite a catalogued record are set aside.

use std::collections::{HashMap, HashSet};

use worldsim_domain::{NamedEntity, NodeType, Relation};

use crate::infrastructure::ports::relation_key;

/// Old-to-new id rewrites made while normalizing, per node type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdRemapping {
    characters: HashMap<String, String>,
    locations: HashMap<String, String>,
}

impl IdRemapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, node_type: NodeType, old_id: impl Into<String>, new_id: impl Into<String>) {
        self.table_mut(node_type).insert(old_id.into(), new_id.into());
    }

    /// The id `id` was rewritten to, if any.
    pub fn lookup(&self, node_type: NodeType, id: &str) -> Option<&str> {
        self.table(node_type).get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.locations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.locations.len()
    }

    fn table(&self, node_type: NodeType) -> &HashMap<String, String> {
        match node_type {
            NodeType::Character => &self.characters,
            NodeType::Location => &self.locations,
        }
    }

    fn table_mut(&mut self, node_type: NodeType) -> &mut HashMap<String, String> {
        match node_type {
            NodeType::Character => &mut self.characters,
            NodeType::Location => &mut self.locations,
        }
    }
}

/// Give every entity its canonical id, recording each rewrite.
pub fn normalize_ids<T: NamedEntity>(entities: &mut [T], remapping: &mut IdRemapping) {
    for entity in entities.iter_mut() {
        let expected = entity.canonical_id();
        if entity.id() != expected {
            tracing::debug!(
                node_type = %T::NODE_TYPE,
                generated_id = %entity.id(),
                expected_id = %expected,
                "Generated id does not match expected form; overwriting"
            );
            remapping.record(T::NODE_TYPE, entity.id(), expected.clone());
            entity.set_id(expected);
        }
    }
}

/// Rewrite relation endpoints that point at a renamed node.
///
/// Returns how many endpoints were rewritten.
pub fn remap_relation_endpoints(relations: &mut [Relation], remapping: &IdRemapping) -> usize {
    if remapping.is_empty() {
        return 0;
    }
    let mut rewritten = 0;
    for relation in relations.iter_mut() {
        if let Some(x) = remapping.lookup(relation.x_node_type, &relation.x_node_id) {
            relation.x_node_id = x.to_string();
            rewritten += 1;
        }
        if let Some(y) = remapping.lookup(relation.y_node_type, &relation.y_node_id) {
            relation.y_node_id = y.to_string();
            rewritten += 1;
        }
    }
    rewritten
}

/// Split normalized proposals into those safe to persist and those already
/// catalogued.
///
/// Proposals with an empty id are dropped. Later duplicates of an id within
/// the batch are dropped. Proposals whose id is already stored are returned
/// in the second list and never overwrite the stored record.
pub fn partition_new_entities<T: NamedEntity>(
    proposed: Vec<T>,
    existing_ids: &HashSet<String>,
) -> (Vec<T>, Vec<T>) {
    let mut seen = HashSet::new();
    let mut fresh = Vec::new();
    let mut known = Vec::new();

    for entity in proposed {
        if entity.id().is_empty() {
            tracing::warn!(
                node_type = %T::NODE_TYPE,
                name = %entity.name(),
                "Skipping proposed element whose name has no usable id"
            );
        } else if existing_ids.contains(entity.id()) {
            tracing::info!(
                node_type = %T::NODE_TYPE,
                id = %entity.id(),
                "Proposed element is already catalogued; leaving it untouched"
            );
            known.push(entity);
        } else if seen.insert(entity.id().to_string()) {
            fresh.push(entity);
        } else {
            tracing::debug!(node_type = %T::NODE_TYPE, id = %entity.id(), "Dropping duplicate proposal");
        }
    }
    (fresh, known)
}

/// Relation counterpart of [`partition_new_entities`], keyed by the ordered
/// endpoint pair. Out-of-range importance scores are cleared, and relations
/// whose endpoints cannot form a storage key are dropped.
pub fn partition_new_relations(
    proposed: Vec<Relation>,
    existing_keys: &HashSet<(String, String)>,
) -> (Vec<Relation>, Vec<Relation>) {
    let mut seen = HashSet::new();
    let mut fresh = Vec::new();
    let mut known = Vec::new();

    for mut relation in proposed {
        if !relation.has_valid_importance() {
            tracing::warn!(
                x_node_id = %relation.x_node_id,
                y_node_id = %relation.y_node_id,
                importance = ?relation.importance,
                "Clearing out-of-range relation importance"
            );
            relation.importance = None;
        }

        let key = (relation.x_node_id.clone(), relation.y_node_id.clone());
        if let Err(e) = relation_key(&key.0, &key.1) {
            tracing::warn!(
                x_node_id = %key.0,
                y_node_id = %key.1,
                error = %e,
                "Skipping relation whose endpoints cannot form a key"
            );
        } else if existing_keys.contains(&key) {
            tracing::info!(x_node_id = %key.0, y_node_id = %key.1, "Proposed relation is already catalogued");
            known.push(relation);
        } else if seen.insert(key) {
            fresh.push(relation);
        }
    }
    (fresh, known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldsim_domain::{Character, Location};

    fn invented(id: &str, name: &str) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            description: "new in town".to_string(),
        }
    }

    #[test]
    fn normalization_rewrites_ids_and_records_mapping() {
        let mut characters = vec![invented("Aria_ONeil", "Aria O'Neil"), invented("mira", "Mira")];
        let mut remapping = IdRemapping::new();

        normalize_ids(&mut characters, &mut remapping);

        assert_eq!(characters[0].id, "aria_oneil");
        assert_eq!(characters[1].id, "mira");
        assert_eq!(remapping.len(), 1);
        assert_eq!(remapping.lookup(NodeType::Character, "Aria_ONeil"), Some("aria_oneil"));
        assert_eq!(remapping.lookup(NodeType::Location, "Aria_ONeil"), None);
    }

    #[test]
    fn relation_endpoints_follow_their_node_type() {
        let mut remapping = IdRemapping::new();
        remapping.record(NodeType::Character, "Aria_ONeil", "aria_oneil");
        remapping.record(NodeType::Location, "The-Docks", "the_docks");

        let mut relations = vec![
            Relation::new(NodeType::Character, "Aria_ONeil", NodeType::Location, "The-Docks", "Works at"),
            // Same raw id but the wrong node type: untouched.
            Relation::new(NodeType::Location, "Aria_ONeil", NodeType::Character, "mira", "Odd"),
        ];

        let rewritten = remap_relation_endpoints(&mut relations, &remapping);

        assert_eq!(rewritten, 2);
        assert_eq!(relations[0].key(), ("aria_oneil", "the_docks"));
        assert_eq!(relations[1].key(), ("Aria_ONeil", "mira"));
    }

    #[test]
    fn catalogued_and_duplicate_proposals_are_not_fresh() {
        let existing: HashSet<String> = ["old_mill".to_string()].into();
        let proposed = vec![
            Location::new("Old Mill", "Claimed to be new"),
            Location::new("Lighthouse", "Tall"),
            Location::new("Lighthouse", "Duplicate"),
            Location::new("???", "No usable id"),
        ];

        let (fresh, known) = partition_new_entities(proposed, &existing);

        assert_eq!(fresh, vec![Location::new("Lighthouse", "Tall")]);
        assert_eq!(known, vec![Location::new("Old Mill", "Claimed to be new")]);
    }

    #[test]
    fn relation_partition_clears_bad_importance() {
        let mut bad = Relation::new(NodeType::Character, "mira", NodeType::Location, "lighthouse", "Climbs");
        bad.importance = Some(42);
        let existing: HashSet<(String, String)> =
            [("mira".to_string(), "old_mill".to_string())].into();
        let stored = Relation::new(NodeType::Character, "mira", NodeType::Location, "old_mill", "Again");

        let (fresh, known) = partition_new_relations(vec![bad, stored.clone()], &existing);

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].importance, None);
        assert_eq!(known, vec![stored]);
    }

    #[test]
    fn relation_partition_drops_unkeyable_endpoints() {
        let ambiguous = Relation::new(NodeType::Character, "a--b", NodeType::Character, "c", "Joined");
        let blank = Relation::new(NodeType::Character, "mira", NodeType::Location, "", "Nowhere");
        let fine = Relation::new(NodeType::Character, "mira", NodeType::Location, "lighthouse", "Climbs");

        let (fresh, known) =
            partition_new_relations(vec![ambiguous, blank, fine.clone()], &HashSet::new());

        assert_eq!(fresh, vec![fine]);
        assert!(known.is_empty());
    }
}
