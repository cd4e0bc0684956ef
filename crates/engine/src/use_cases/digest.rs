//! Markdown renderings of world records for the run journal and prompts.

use worldsim_domain::{Character, CharacterOrbit, Location, Relation};

pub fn character_list(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|c| format!("- **{}**: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn location_list(locations: &[Location]) -> String {
    locations
        .iter()
        .map(|l| format!("- **{}**: {}", l.name, l.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn relation_list(relations: &[Relation]) -> String {
    relations
        .iter()
        .map(|r| {
            format!(
                "- ({}:**{}**)->({}:**{}**): {}",
                r.x_node_type, r.x_node_id, r.y_node_type, r.y_node_id, r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The world in three headed sections.
pub fn world(characters: &[Character], locations: &[Location], relations: &[Relation]) -> [String; 3] {
    [
        format!("#### CHARACTERS\n{}", character_list(characters)),
        format!("#### LOCATIONS\n{}", location_list(locations)),
        format!("#### RELATIONS\n{}", relation_list(relations)),
    ]
}

/// A character and its neighborhood, for the director's context.
pub fn orbit(orbit: &CharacterOrbit) -> String {
    let mut sections = vec![format!(
        "--- {} ---\n{}",
        orbit.character.name, orbit.character.description
    )];
    if !orbit.relations.is_empty() {
        sections.push(format!("Relations:\n{}", relation_list(&orbit.relations)));
    }
    if !orbit.related_characters.is_empty() {
        sections.push(format!(
            "Related characters:\n{}",
            character_list(&orbit.related_characters)
        ));
    }
    if !orbit.related_locations.is_empty() {
        sections.push(format!(
            "Related locations:\n{}",
            location_list(&orbit.related_locations)
        ));
    }
    sections.join("\n\n")
}
