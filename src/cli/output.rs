//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map startup/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::MissingCredential(var) => format!(
            "Missing credential: set {} or provider.api_key in the config file",
            var
        ),
        other => other.to_string(),
    }
}
