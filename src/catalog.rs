//! Model catalog and working-model selection.
//!
//! The catalog is a fixed ordered list of model identifiers. Selection walks a
//! shuffled queue of untried entries, probing each one sequentially, and falls
//! back to the configured default when nothing answers.

use crate::config::CatalogSettings;
use crate::error::ApiError;
use crate::provider::ModelBackend;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_CATALOG: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-preview-09-2025",
    "gemini-2.5-flash-lite",
    "gemini-2.5-flash-lite-preview-09-2025",
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Ordered, non-empty list of candidate models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<String>,
    default_model: String,
}

impl ModelCatalog {
    pub fn new(models: Vec<String>, default_model: impl Into<String>) -> Result<Self, ApiError> {
        if models.is_empty() {
            return Err(ApiError::ConfigError(
                "Model catalog must contain at least one model".to_string(),
            ));
        }
        Ok(Self {
            models,
            default_model: default_model.into(),
        })
    }

    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, ApiError> {
        Self::new(settings.models.clone(), settings.default_model.clone())
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Uniform random entry.
    pub fn pick_random(&self) -> &str {
        self.models
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }

    /// Uniform random entry outside `tried`. Once every entry has been tried
    /// the random sample is accepted as is.
    pub fn pick_untried(&self, tried: &HashSet<String>) -> &str {
        let untried: Vec<&String> = self.models.iter().filter(|m| !tried.contains(*m)).collect();
        match untried.choose(&mut rand::thread_rng()).copied() {
            Some(model) => model.as_str(),
            None => self.pick_random(),
        }
    }

    /// Every entry once, in random order.
    pub fn untried_queue(&self) -> VecDeque<String> {
        let mut models = self.models.clone();
        models.shuffle(&mut rand::thread_rng());
        models.into()
    }
}

/// Picks a model that answers, probing sequentially
pub struct ModelSelector {
    catalog: ModelCatalog,
    backend: Arc<dyn ModelBackend>,
    probe_prompt: String,
    probe_timeout: Duration,
}

impl ModelSelector {
    pub fn new(
        catalog: ModelCatalog,
        backend: Arc<dyn ModelBackend>,
        probe_prompt: impl Into<String>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            backend,
            probe_prompt: probe_prompt.into(),
            probe_timeout,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &Arc<dyn ModelBackend> {
        &self.backend
    }

    /// True when the model returns any usable response to the probe prompt.
    pub async fn probe_liveness(&self, model_id: &str) -> bool {
        let handle = match self.backend.create_model(model_id) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(model = model_id, error_kind = e.kind(), error = %e, "Model probe failed");
                return false;
            }
        };

        match tokio::time::timeout(self.probe_timeout, handle.generate(&self.probe_prompt)).await {
            Ok(Ok(response)) if !response.text.trim().is_empty() => true,
            Ok(Ok(_)) => {
                warn!(model = model_id, error_kind = "empty_response", "Model probe failed");
                false
            }
            Ok(Err(e)) => {
                warn!(model = model_id, error_kind = e.kind(), error = %e, "Model probe failed");
                false
            }
            Err(_) => {
                warn!(
                    model = model_id,
                    error_kind = "timeout",
                    timeout_ms = self.probe_timeout.as_millis() as u64,
                    "Model probe failed"
                );
                false
            }
        }
    }

    /// First live model from a shuffled pass over the catalog, or the default
    /// model unverified when none answers. Never fails.
    pub async fn select_working_model(&self) -> String {
        let mut queue = self.catalog.untried_queue();
        let mut attempts = 0usize;
        while let Some(model) = queue.pop_front() {
            attempts += 1;
            debug!(model = %model, attempt = attempts, "Probing model");
            if self.probe_liveness(&model).await {
                info!(model = %model, attempts, "Using model");
                return model;
            }
        }

        warn!(
            default_model = self.catalog.default_model(),
            attempts, "All models failed probing, falling back to default"
        );
        self.catalog.default_model().to_string()
    }
}
