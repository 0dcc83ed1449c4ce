//! Error types for the capstone idea generator.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Backend and configuration errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Provider returned an empty response for model {0}")]
    EmptyResponse(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// Stable label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ProviderError(_) => "provider_error",
            ApiError::ProviderRequestFailed(_) => "provider_request_failed",
            ApiError::ProviderAuthFailed(_) => "provider_auth_failed",
            ApiError::ProviderRateLimit(_) => "provider_quota",
            ApiError::ProviderModelNotFound(_) => "provider_model_not_found",
            ApiError::EmptyResponse(_) => "empty_response",
            ApiError::MissingCredential(_) => "missing_credential",
            ApiError::ConfigError(_) => "config_error",
        }
    }
}

/// Failures turning raw model text into a typed idea
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON object found in model response")]
    NoJsonFound { raw: String },

    #[error("Model response is not valid JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model response does not match the idea schema: {source}")]
    SchemaViolation {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::NoJsonFound { .. } => "no_json_found",
            ParseError::InvalidJson { .. } => "invalid_json",
            ParseError::SchemaViolation { .. } => "schema_violation",
        }
    }

    /// The text the failure was raised against, kept for operator diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::NoJsonFound { raw }
            | ParseError::InvalidJson { raw, .. }
            | ParseError::SchemaViolation { raw, .. } => raw,
        }
    }
}

/// Orchestration failure taxonomy
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Rate limit exceeded until {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Model {model} unavailable: {source}")]
    ModelUnavailable {
        model: String,
        #[source]
        source: ApiError,
    },

    #[error("Model {model} produced unusable output: {source}")]
    Parse {
        model: String,
        #[source]
        source: ParseError,
    },

    #[error("Model {model} did not answer within {after:?}")]
    Timeout { model: String, after: Duration },

    #[error("All models failed to generate content")]
    AllModelsFailed,

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

pub const ALL_MODELS_FAILED_MESSAGE: &str =
    "All models failed to generate content. Please try again later.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::RateLimited { .. } => "rate_limited",
            GenerationError::ModelUnavailable { source, .. } => source.kind(),
            GenerationError::Parse { source, .. } => source.kind(),
            GenerationError::Timeout { .. } => "timeout",
            GenerationError::AllModelsFailed => "all_models_failed",
            GenerationError::Unexpected(_) => "unexpected",
        }
    }

    /// Model the failure is attributed to, when there is one.
    pub fn model(&self) -> Option<&str> {
        match self {
            GenerationError::ModelUnavailable { model, .. }
            | GenerationError::Parse { model, .. }
            | GenerationError::Timeout { model, .. } => Some(model),
            _ => None,
        }
    }

    /// Caller-facing text for the terminal envelope.
    ///
    /// Backend failures surface their own message only on the single-model
    /// path; everything else is reported generically.
    pub fn user_message(&self, now: DateTime<Utc>) -> String {
        match self {
            GenerationError::RateLimited { reset_at } => format!(
                "Rate limit exceeded. Please wait {} seconds before trying again.",
                remaining_seconds(*reset_at, now)
            ),
            GenerationError::ModelUnavailable { source, .. } => source.to_string(),
            GenerationError::Parse { source, .. } => source.to_string(),
            GenerationError::Timeout { .. } => self.to_string(),
            GenerationError::AllModelsFailed => ALL_MODELS_FAILED_MESSAGE.to_string(),
            GenerationError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Whole seconds left until `reset_at`, rounded up.
pub fn remaining_seconds(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (reset_at - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 999) / 1000
}
