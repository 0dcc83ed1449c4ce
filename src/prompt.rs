//! Prompt rendering for idea generation.
//!
//! Facet values are substituted verbatim in a single pass; nothing is escaped
//! or validated, and placeholder-like text inside a value is left alone.

use crate::types::FacetSelection;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(industry|project_type|difficulty)\}").expect("placeholder pattern is valid")
});

const IDEA_PROMPT_TEMPLATE: &str = r#"You are an experienced capstone project advisor for undergraduate and graduate Computer Science and IT students. Propose one original, educational, industry-relevant capstone project.

PROJECT PARAMETERS:
- Industry: {industry}
- Project type: {project_type}
- Difficulty: {difficulty}
- Team size: 1-4 students
- Timeline: a typical academic capstone term

ACADEMIC EXPECTATIONS:
- Demonstrates command of core computer science concepts through a working implementation
- Includes a clear problem statement, a short research component, a testing and validation plan, and documentation
- Can be evaluated and graded, and presented as a portfolio piece

Respond ONLY with a single JSON object and nothing else (no markdown, no commentary), using exactly this structure:
{
  "title": "Descriptive project title that names the problem being solved",
  "description": "Three to four paragraphs covering the problem and motivation, the target users, the key features, and the educational value",
  "technologyStack": ["Technology 1", "Technology 2", "Technology 3", "Technology 4", "Technology 5"],
  "similarProjects": [
    {"name": "Existing project 1", "description": "What it does and how it relates to this idea", "url": "https://..."},
    {"name": "Existing project 2", "description": "What it does and how it relates to this idea", "url": "https://..."},
    {"name": "Existing project 3", "description": "What it does and how it relates to this idea", "url": "https://..."},
    {"name": "Existing project 4", "description": "What it does and how it relates to this idea", "url": "https://..."},
    {"name": "Existing project 5", "description": "What it does and how it relates to this idea", "url": "https://..."}
  ],
  "learningOutcomes": ["Outcome 1", "Outcome 2", "Outcome 3", "Outcome 4"],
  "difficultyLevel": "Beginner|Intermediate|Advanced",
  "estimatedHours": "Month range between 1 and 5 months, for example 2-3 months",
  "prerequisites": ["Prerequisite 1", "Prerequisite 2", "Prerequisite 3"]
}

CONTENT RULES:
- "difficultyLevel" must be exactly "{difficulty}". Not a nearby level, the same value.
- "similarProjects" must list exactly 5 real, existing projects (open-source repositories or live products) that anyone can verify, each with a working URL.
- "estimatedHours" must be a month range no shorter than 1 month and no longer than 5 months.
- "technologyStack" must contain well-known, widely used technologies that employers hire for, appropriate for a {project_type} in the {industry} industry.

DIFFICULTY GUIDANCE for a {difficulty} project:
- Beginner: simpler technologies, fundamental concepts, minimal prerequisites
- Intermediate: moderately complex technologies, some advanced concepts, moderate prerequisites
- Advanced: complex technologies, advanced concepts, substantial prerequisites
Scale the scope, technology stack and prerequisites to match."#;

/// Render the generation prompt for `facets`.
pub fn build_prompt(facets: &FacetSelection) -> String {
    PLACEHOLDER
        .replace_all(IDEA_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "industry" => facets.industry.clone(),
            "project_type" => facets.project_type.clone(),
            _ => facets.difficulty.clone(),
        })
        .into_owned()
}
