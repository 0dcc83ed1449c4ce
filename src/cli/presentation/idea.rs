//! Generate command presentation: result envelope as text or json.

use super::shared::{format_section_heading, to_pretty_json};
use crate::types::{CapstoneIdea, ResultEnvelope};
use owo_colors::OwoColorize;

pub fn format_envelope_json(envelope: &ResultEnvelope) -> String {
    to_pretty_json(envelope)
}

pub fn format_envelope_text(envelope: &ResultEnvelope) -> String {
    match (&envelope.data, &envelope.error) {
        (Some(idea), _) if envelope.success => format_idea_text(idea),
        (_, error) => {
            let message = error.as_deref().unwrap_or("Generation failed");
            format!("{} {}", "Error:".red().bold(), message)
        }
    }
}

fn format_idea_text(data: &CapstoneIdea) -> String {
    let idea = &data.idea;
    let mut out = String::new();
    out.push_str(&format!("{}\n", idea.title.bold()));
    out.push_str(&format!(
        "{} · {} · {} (model rated: {}) · {}\n\n",
        data.industry,
        data.project_type,
        data.difficulty,
        idea.difficulty_level,
        idea.estimated_hours
    ));
    out.push_str(&format!("{}\n", idea.description));

    push_list(&mut out, "Technology Stack", &idea.technology_stack);
    push_list(&mut out, "Learning Outcomes", &idea.learning_outcomes);
    push_list(&mut out, "Prerequisites", &idea.prerequisites);

    out.push_str(&format!("\n{}\n", format_section_heading("Similar Projects")));
    if idea.similar_projects.is_empty() {
        out.push_str("  (none)\n");
    }
    for project in &idea.similar_projects {
        out.push_str(&format!(
            "  - {} <{}>\n    {}\n",
            project.name,
            project.url.dimmed(),
            project.description
        ));
    }
    out
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    out.push_str(&format!("\n{}\n", format_section_heading(heading)));
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}
