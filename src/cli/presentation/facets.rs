//! Facets command presentation.

use super::shared::{format_section_heading, to_pretty_json};
use crate::types::{DIFFICULTY_LEVELS, INDUSTRIES, PROJECT_TYPES};

pub fn format_facets_text() -> String {
    let mut out = String::new();
    for (heading, values) in [
        ("Industries", INDUSTRIES),
        ("Project Types", PROJECT_TYPES),
        ("Difficulty Levels", DIFFICULTY_LEVELS),
    ] {
        out.push_str(&format!("{}\n", format_section_heading(heading)));
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn format_facets_json() -> String {
    to_pretty_json(&serde_json::json!({
        "industries": INDUSTRIES,
        "projectTypes": PROJECT_TYPES,
        "difficultyLevels": DIFFICULTY_LEVELS,
    }))
}
