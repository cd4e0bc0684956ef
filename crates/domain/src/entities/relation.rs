//! Relation entity - a directed edge between two world nodes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Lowest meaningful importance score.
pub const MIN_IMPORTANCE: i64 = 1;

/// Highest meaningful importance score.
pub const MAX_IMPORTANCE: i64 = 10;

/// The kind of node at either end of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Character,
    Location,
}

impl NodeType {
    /// Get the string representation used in storage and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "character" => Ok(Self::Character),
            "location" => Ok(Self::Location),
            other => Err(DomainError::parse(format!("unknown node type: {other}"))),
        }
    }
}

/// A directed relation from node X to node Y.
///
/// Identity is the ordered pair `(x_node_id, y_node_id)`; the reverse edge is
/// a different relation. Endpoint ids are not checked against stored nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub x_node_id: String,
    pub x_node_type: NodeType,
    pub y_node_id: String,
    pub y_node_type: NodeType,
    /// Description of the relation between node X and Y
    pub description: String,
    /// 1-10: how essential this relation is to node X's identity and daily life
    #[serde(default, deserialize_with = "deserialize_importance")]
    pub importance: Option<i64>,
}

impl Relation {
    pub fn new(
        x_node_type: NodeType,
        x_node_id: impl Into<String>,
        y_node_type: NodeType,
        y_node_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            x_node_id: x_node_id.into(),
            x_node_type,
            y_node_id: y_node_id.into(),
            y_node_type,
            description: description.into(),
            importance: None,
        }
    }

    /// Set the importance score.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the score is outside 1-10.
    pub fn with_importance(mut self, importance: i64) -> Result<Self, DomainError> {
        if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
            return Err(DomainError::validation(format!(
                "Relation importance must be between {MIN_IMPORTANCE} and {MAX_IMPORTANCE}, got {importance}"
            )));
        }
        self.importance = Some(importance);
        Ok(self)
    }

    /// Whether the importance score, if any, lies within 1-10.
    pub fn has_valid_importance(&self) -> bool {
        self.importance
            .map_or(true, |i| (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&i))
    }

    /// The ordered pair this relation is keyed by.
    pub fn key(&self) -> (&str, &str) {
        (&self.x_node_id, &self.y_node_id)
    }
}

/// Read an importance score the way models actually write it.
///
/// Any integer, float or numeric string is accepted; floats are rounded and
/// values beyond `i64` saturate. Range is not checked here. Null and
/// non-numeric strings read as no score.
fn deserialize_importance<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct ImportanceVisitor;

    impl<'de> Visitor<'de> for ImportanceVisitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an importance score as a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(i64::try_from(value).unwrap_or(i64::MAX)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            // `as` saturates
            Ok(value.is_finite().then(|| value.round() as i64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.trim();
            match value.parse::<i64>() {
                Ok(score) => Ok(Some(score)),
                Err(_) => value.parse::<f64>().map_or(Ok(None), |f| self.visit_f64(f)),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(ImportanceVisitor)
        }
    }

    deserializer.deserialize_any(ImportanceVisitor)
}
