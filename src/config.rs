//! Configuration System
//!
//! Layered configuration for the generator: merge-policy defaults, the global
//! file, workspace files, then `IDEAGEN__SECTION__KEY` environment overrides.
//! Rate-limit window, model catalog, provider endpoint and timeouts all live
//! here instead of in code.

use crate::catalog::{DEFAULT_CATALOG, DEFAULT_MODEL};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::GEMINI_BASE_URL;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeagenConfig {
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Admission window per caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

/// Longest admission window accepted from configuration (30 days)
pub const MAX_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

fn default_window_secs() -> u64 {
    3 * 60
}

fn default_max_requests() -> u32 {
    1
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl RateLimitSettings {
    /// Window as a duration. Fails for zero or anything above
    /// [`MAX_WINDOW_SECS`].
    pub fn window(&self) -> Result<chrono::Duration, ApiError> {
        if self.window_secs == 0 || self.window_secs > MAX_WINDOW_SECS {
            return Err(window_out_of_range(self.window_secs));
        }
        i64::try_from(self.window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| window_out_of_range(self.window_secs))
    }
}

fn window_out_of_range(secs: u64) -> ApiError {
    ApiError::ConfigError(format!(
        "rate_limit.window_secs must be between 1 and {}, got {}",
        MAX_WINDOW_SECS, secs
    ))
}

/// Ordered model catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Used unverified when no catalog entry passes the liveness probe
    #[serde(default = "default_model")]
    pub default_model: String,
}

fn default_models() -> Vec<String> {
    DEFAULT_CATALOG.iter().map(|m| m.to_string()).collect()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            models: default_models(),
            default_model: default_model(),
        }
    }
}

/// Backend endpoint and credential lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Inline credential; normally left unset in favour of `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    GEMINI_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_GENERATIVE_AI_API_KEY".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Per-call bounds for the orchestration flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_probe_prompt")]
    pub probe_prompt: String,
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    15
}

fn default_probe_prompt() -> String {
    "Test".to_string()
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            generation_timeout_secs: default_generation_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            probe_prompt: default_probe_prompt(),
        }
    }
}

impl OrchestratorSettings {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    RateLimit(String),
    Catalog(String),
    Provider(String),
    Orchestrator(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::RateLimit(msg) => write!(f, "Rate limit: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Orchestrator(msg) => write!(f, "Orchestrator: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl IdeagenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.rate_limit.window_secs == 0 {
            errors.push(ValidationError::RateLimit(
                "window_secs must be greater than zero".to_string(),
            ));
        } else if self.rate_limit.window_secs > MAX_WINDOW_SECS {
            errors.push(ValidationError::RateLimit(format!(
                "window_secs must be at most {}, got {}",
                MAX_WINDOW_SECS, self.rate_limit.window_secs
            )));
        }
        if self.rate_limit.max_requests == 0 {
            errors.push(ValidationError::RateLimit(
                "max_requests must be greater than zero".to_string(),
            ));
        }

        if self.catalog.models.is_empty() {
            errors.push(ValidationError::Catalog(
                "at least one model is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for model in &self.catalog.models {
            if model.trim().is_empty() {
                errors.push(ValidationError::Catalog(
                    "model identifiers cannot be blank".to_string(),
                ));
            } else if !seen.insert(model.as_str()) {
                errors.push(ValidationError::Catalog(format!(
                    "duplicate model '{}'",
                    model
                )));
            }
        }
        if self.catalog.default_model.trim().is_empty() {
            errors.push(ValidationError::Catalog(
                "default_model cannot be blank".to_string(),
            ));
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            errors.push(ValidationError::Provider(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.provider.base_url
            )));
        }
        if self.provider.api_key_env.trim().is_empty() {
            errors.push(ValidationError::Provider(
                "api_key_env cannot be blank".to_string(),
            ));
        }
        if self.provider.connect_timeout_secs == 0 || self.provider.request_timeout_secs == 0 {
            errors.push(ValidationError::Provider(
                "HTTP timeouts must be greater than zero".to_string(),
            ));
        }

        if self.orchestrator.generation_timeout_secs == 0
            || self.orchestrator.probe_timeout_secs == 0
        {
            errors.push(ValidationError::Orchestrator(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
