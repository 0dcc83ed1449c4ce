//! CLI domain: parse, route, output, and presentation only.
//! No orchestration logic here; the route table dispatches to library services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_envelope_json, format_envelope_text, format_facets_json, format_facets_text,
    format_models_json, format_models_text, ModelStatus,
};
pub use route::{CommandOutput, RunContext};
