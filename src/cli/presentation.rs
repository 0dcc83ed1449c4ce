//! CLI presentation: text and json formatters per command family.

mod facets;
mod idea;
mod models;
mod shared;

pub use facets::{format_facets_json, format_facets_text};
pub use idea::{format_envelope_json, format_envelope_text};
pub use models::{format_models_json, format_models_text, ModelStatus};
