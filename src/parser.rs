//! Response parsing: pull a JSON object out of free-form model text and
//! decode it into a [`GeneratedIdea`].

use crate::error::ParseError;
use crate::types::{GeneratedIdea, EXPECTED_SIMILAR_PROJECTS};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// First fenced region, optionally tagged `json`, whose content is an object.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("fenced JSON pattern is valid")
});

/// Locate the JSON payload in `raw`.
///
/// A fenced block wins; otherwise the span from the first `{` to the last
/// `}` is taken as a best effort.
pub fn extract_json(raw: &str) -> Result<&str, ParseError> {
    if let Some(inner) = FENCED_JSON.captures(raw).and_then(|caps| caps.get(1)) {
        return Ok(inner.as_str());
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(ParseError::NoJsonFound {
            raw: raw.to_string(),
        }),
    }
}

/// Decode an extracted span. Syntax errors and schema mismatches are kept
/// apart; neither yields a partial object.
pub fn decode(json: &str) -> Result<GeneratedIdea, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|source| ParseError::InvalidJson {
            raw: json.to_string(),
            source,
        })?;

    let idea: GeneratedIdea =
        serde_json::from_value(value).map_err(|source| ParseError::SchemaViolation {
            raw: json.to_string(),
            source,
        })?;

    if idea.title.trim().is_empty() {
        return Err(ParseError::SchemaViolation {
            raw: json.to_string(),
            source: serde::de::Error::custom("title must not be empty"),
        });
    }

    if idea.similar_projects.len() != EXPECTED_SIMILAR_PROJECTS {
        warn!(
            expected = EXPECTED_SIMILAR_PROJECTS,
            actual = idea.similar_projects.len(),
            "Model returned an unexpected number of similar projects"
        );
    }

    Ok(idea)
}

/// [`extract_json`] then [`decode`].
pub fn parse_response(raw: &str) -> Result<GeneratedIdea, ParseError> {
    decode(extract_json(raw)?)
}
