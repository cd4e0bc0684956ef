//! JSON schema of the structured answer the archivist must give.

use serde_json::{json, Value};

use crate::infrastructure::actor::ResponseShape;

pub const NEW_ELEMENTS_SHAPE: &str = "NewElementsAnalysis";

fn node_schema(kind: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "string", "description": format!("Identifier of this {kind}: its name in lowercase, spaces as underscores, punctuation removed")},
            "name": {"type": "string", "description": format!("Full name of this {kind}")},
            "description": {"type": "string", "description": format!("Core description of this {kind}")}
        },
        "required": ["id", "name", "description"]
    })
}

fn relation_schema() -> Value {
    let node_type = json!({"type": "string", "enum": ["character", "location"]});
    json!({
        "type": "object",
        "properties": {
            "x_node_id": {"type": "string"},
            "x_node_type": node_type,
            "y_node_id": {"type": "string"},
            "y_node_type": node_type,
            "description": {"type": "string", "description": "Description of the relation between node X and Y"},
            "importance": {
                "type": "integer",
                "minimum": 1,
                "maximum": 10,
                "description": "A number between 1-10 (10 is high) indicating how essential this relation is to node X's identity and relevance to daily life"
            }
        },
        "required": ["x_node_id", "x_node_type", "y_node_id", "y_node_type", "description"]
    })
}

fn list_of(items: Value, description: &str) -> Value {
    json!({"type": "array", "items": items, "description": description})
}

/// The shape requested from the archivist.
pub fn new_elements_shape() -> ResponseShape {
    ResponseShape::new(
        NEW_ELEMENTS_SHAPE,
        json!({
            "type": "object",
            "properties": {
                "new_characters": list_of(node_schema("character"),
                    "Any new characters from the NEW_STORY_VIGNETTE that are not already in the EXISTING_CHARACTER_LIST"),
                "new_locations": list_of(node_schema("location"),
                    "Any new locations from the NEW_STORY_VIGNETTE that are not already in the EXISTING_LOCATION_LIST"),
                "new_relations": list_of(relation_schema(),
                    "Any new relations from the NEW_STORY_VIGNETTE that are not already in the EXISTING_RELATIONS_LIST"),
                "features_existing_characters": list_of(node_schema("character"),
                    "Characters from the EXISTING_CHARACTER_LIST that appear in the NEW_STORY_VIGNETTE"),
                "features_existing_locations": list_of(node_schema("location"),
                    "Locations from the EXISTING_LOCATION_LIST that appear in the NEW_STORY_VIGNETTE"),
                "features_existing_relations": list_of(relation_schema(),
                    "Relations from the EXISTING_RELATIONS_LIST that appear in the NEW_STORY_VIGNETTE")
            },
            "required": ["new_characters", "new_locations", "new_relations"]
        }),
    )
}
