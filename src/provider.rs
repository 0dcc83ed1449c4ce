//! Model Provider Abstraction
//!
//! The generative-text backend seen by the orchestrator: a backend hands out
//! per-model handles, and a handle turns prompt text into response text.
//! [`GeminiBackend`] talks to the Gemini REST API.

use crate::config::ProviderSettings;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Text produced by a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub model: String,
}

/// A single model ready to generate
#[async_trait]
pub trait ModelHandle: Send + Sync {
    /// Send `prompt` and return the model's text
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, ApiError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Factory for model handles
pub trait ModelBackend: Send + Sync {
    fn create_model(&self, model_id: &str) -> Result<Box<dyn ModelHandle>, ApiError>;
}

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

fn build_provider_http_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

// Helper function to map transport errors to ApiError
fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => {
                    format!("{}: {}", status_text, msg)
                }
                _ => msg,
            })
        })
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", message)),
        404 => ApiError::ProviderModelNotFound(format!("Model not found: {}", message)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", message)),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, message
        )),
    }
}

/// Gemini REST backend. One HTTP client shared by every handle.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, settings: &ProviderSettings) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential(settings.api_key_env.clone()));
        }
        let client = build_provider_http_client(
            Duration::from_secs(settings.connect_timeout_secs),
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').into(),
        })
    }

    /// Build from configuration, resolving the credential from the config
    /// value first and the configured environment variable second.
    ///
    /// A missing credential is a startup failure.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(&settings.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::MissingCredential(settings.api_key_env.clone()))?;
        Self::new(api_key, settings)
    }
}

impl ModelBackend for GeminiBackend {
    fn create_model(&self, model_id: &str) -> Result<Box<dyn ModelHandle>, ApiError> {
        if model_id.trim().is_empty() {
            return Err(ApiError::ProviderModelNotFound(
                "Model identifier is empty".to_string(),
            ));
        }
        Ok(Box::new(GeminiModel {
            backend: self.clone(),
            model: model_id.to_string(),
        }))
    }
}

/// Handle for one Gemini model
pub struct GeminiModel {
    backend: GeminiBackend,
    model: String,
}

#[async_trait]
impl ModelHandle for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, ApiError> {
        let url = format!("{}/{}:generateContent", self.backend.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .backend
            .client
            .post(&url)
            .header("x-goog-api-key", self.backend.api_key.as_ref())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_error(status, &error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;

        let text = extract_text(parsed).ok_or_else(|| ApiError::EmptyResponse(self.model.clone()))?;

        Ok(GenerationResponse {
            text,
            model: self.model.clone(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// Gemini wire structures
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenated text parts of the first candidate, if any is non-blank.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates?.into_iter().next()?;
    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
