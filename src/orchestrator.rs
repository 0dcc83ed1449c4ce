//! Generation Orchestrator
//!
//! Turns a facet selection into a [`ResultEnvelope`]: rate check, model
//! selection, primary generation, then at most one blind retry on a different
//! model. The public entry point never returns an error and never unwinds;
//! every failure is logged with its kind and folded into the envelope.

use crate::catalog::{ModelCatalog, ModelSelector};
use crate::config::IdeagenConfig;
use crate::error::{ApiError, GenerationError};
use crate::parser::parse_response;
use crate::prompt::build_prompt;
use crate::provider::ModelBackend;
use crate::rate_limit::{Admission, RateLimiter};
use crate::types::{CapstoneIdea, FacetSelection, GeneratedIdea, ResultEnvelope};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Caller id used when the caller supplies none
pub const ANONYMOUS_CALLER: &str = "anonymous";

pub struct Orchestrator {
    limiter: RateLimiter,
    selector: ModelSelector,
    generation_timeout: Duration,
}

impl Orchestrator {
    pub fn new(limiter: RateLimiter, selector: ModelSelector, generation_timeout: Duration) -> Self {
        Self {
            limiter,
            selector,
            generation_timeout,
        }
    }

    /// Wire an orchestrator from configuration with an in-memory rate-limit
    /// store.
    ///
    /// The store keeps one record per distinct caller. Long-lived hosts must
    /// call [`Orchestrator::evict_expired`] periodically to bound it.
    pub fn from_config(
        config: &IdeagenConfig,
        backend: Arc<dyn ModelBackend>,
    ) -> Result<Self, ApiError> {
        let catalog = ModelCatalog::from_settings(&config.catalog)?;
        let selector = ModelSelector::new(
            catalog,
            backend,
            config.orchestrator.probe_prompt.clone(),
            config.orchestrator.probe_timeout(),
        );
        let limiter =
            RateLimiter::in_memory(config.rate_limit.window()?, config.rate_limit.max_requests);
        Ok(Self::new(
            limiter,
            selector,
            config.orchestrator.generation_timeout(),
        ))
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Drop rate-limit records whose window has ended. Returns how many went.
    pub fn evict_expired(&self) -> usize {
        let evicted = self.limiter.store().evict_expired(self.limiter.now());
        if evicted > 0 {
            debug!(evicted, "Evicted expired rate-limit records");
        }
        evicted
    }

    /// Generate one idea for `request` on behalf of `caller_id`
    /// (`"anonymous"` when absent).
    pub async fn generate_idea(
        &self,
        request: &FacetSelection,
        caller_id: Option<&str>,
    ) -> ResultEnvelope {
        let caller_id = caller_id.unwrap_or(ANONYMOUS_CALLER);

        let outcome = AssertUnwindSafe(self.run(request, caller_id))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(GenerationError::Unexpected(panic_message(payload.as_ref())))
            });

        match outcome {
            Ok(idea) => ResultEnvelope::success(idea),
            Err(err) => {
                let now = self.limiter.now();
                match err {
                    GenerationError::RateLimited { reset_at } => {
                        ResultEnvelope::rate_limited(err.user_message(now), reset_at)
                    }
                    _ => {
                        error!(
                            caller_id,
                            model = err.model().unwrap_or("-"),
                            error_kind = err.kind(),
                            error = %err,
                            "Idea generation failed"
                        );
                        ResultEnvelope::failure(err.user_message(now))
                    }
                }
            }
        }
    }

    async fn run(
        &self,
        request: &FacetSelection,
        caller_id: &str,
    ) -> Result<CapstoneIdea, GenerationError> {
        if let Admission::Denied { reset_at } = self.limiter.check_and_consume(caller_id) {
            info!(caller_id, reset_at = %reset_at, "Request rejected by rate limiter");
            return Err(GenerationError::RateLimited { reset_at });
        }

        let primary = self.selector.select_working_model().await;
        let prompt = build_prompt(request);

        let primary_err = match self.attempt(&primary, &prompt).await {
            Ok(idea) => {
                info!(caller_id, model = %primary, "Generated idea");
                return Ok(CapstoneIdea::assemble(idea, request));
            }
            Err(err) => err,
        };

        log_attempt_failure(caller_id, "primary", &primary_err);
        if self.selector.catalog().len() <= 1 {
            return Err(primary_err);
        }

        let tried: HashSet<String> = [primary].into_iter().collect();
        let fallback = self.selector.catalog().pick_untried(&tried).to_string();
        info!(caller_id, model = %fallback, "Retrying with a different model");

        match self.attempt(&fallback, &prompt).await {
            Ok(idea) => {
                info!(caller_id, model = %fallback, "Generated idea with fallback model");
                Ok(CapstoneIdea::assemble(idea, request))
            }
            Err(fallback_err) => {
                log_attempt_failure(caller_id, "fallback", &fallback_err);
                Err(GenerationError::AllModelsFailed)
            }
        }
    }

    /// One generation round trip on `model`, bounded by the generation timeout.
    async fn attempt(&self, model: &str, prompt: &str) -> Result<GeneratedIdea, GenerationError> {
        let unavailable = |source: ApiError| GenerationError::ModelUnavailable {
            model: model.to_string(),
            source,
        };

        let handle = self.selector.backend().create_model(model).map_err(unavailable)?;
        let response = tokio::time::timeout(self.generation_timeout, handle.generate(prompt))
            .await
            .map_err(|_| GenerationError::Timeout {
                model: model.to_string(),
                after: self.generation_timeout,
            })?
            .map_err(unavailable)?;
        debug!(
            model = %response.model,
            response_len = response.text.len(),
            "Model responded"
        );

        parse_response(&response.text).map_err(|source| GenerationError::Parse {
            model: model.to_string(),
            source,
        })
    }
}

fn log_attempt_failure(caller_id: &str, stage: &'static str, err: &GenerationError) {
    warn!(
        caller_id,
        stage,
        model = err.model().unwrap_or("-"),
        error_kind = err.kind(),
        error = %err,
        "Generation attempt failed"
    );
    if let GenerationError::Parse { source, .. } = err {
        debug!(stage, raw = source.raw(), "Unparseable model output");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
