//! CLI route: single route table and run context. Dispatches to library
//! services and presentation.

use crate::catalog::{ModelCatalog, ModelSelector};
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_envelope_json, format_envelope_text, format_facets_json, format_facets_text,
    format_models_json, format_models_text, ModelStatus,
};
use crate::config::{ConfigLoader, IdeagenConfig};
use crate::error::ApiError;
use crate::orchestrator::Orchestrator;
use crate::provider::{GeminiBackend, ModelBackend};
use crate::types::FacetSelection;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Rendered command result. `success` drives the process exit code.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: validated config and an optional
/// injected backend. Without one, the Gemini backend is built on first use.
/// The orchestrator (and with it the rate-limit store) lives as long as the
/// context.
pub struct RunContext {
    config: IdeagenConfig,
    backend: Option<Arc<dyn ModelBackend>>,
    orchestrator: OnceCell<Orchestrator>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::from_config(config)
    }

    /// Validate `config` and build a context that creates its own backend.
    pub fn from_config(config: IdeagenConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            ApiError::ConfigError(format!("Invalid configuration: {}", joined))
        })?;
        Ok(Self {
            config,
            backend: None,
            orchestrator: OnceCell::new(),
        })
    }

    pub fn with_backend(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(&self) -> &IdeagenConfig {
        &self.config
    }

    fn backend(&self) -> Result<Arc<dyn ModelBackend>, ApiError> {
        match &self.backend {
            Some(backend) => Ok(Arc::clone(backend)),
            None => Ok(Arc::new(GeminiBackend::from_settings(&self.config.provider)?)),
        }
    }

    fn orchestrator(&self) -> Result<&Orchestrator, ApiError> {
        self.orchestrator
            .get_or_try_init(|| Orchestrator::from_config(&self.config, self.backend()?))
    }

    /// Execute a command and render its output.
    pub async fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Generate {
                industry,
                project_type,
                difficulty,
                caller,
                format,
            } => {
                let request = FacetSelection::new(industry, project_type, difficulty);
                self.handle_generate(&request, caller.as_deref(), *format)
                    .await
            }
            Commands::Models { probe, format } => self.handle_models(*probe, *format).await,
            Commands::Facets { format } => Ok(CommandOutput::ok(match format {
                OutputFormat::Json => format_facets_json(),
                OutputFormat::Text => format_facets_text(),
            })),
        };
        info!(
            command = command_name(command),
            duration_ms = started.elapsed().as_millis() as u64,
            ok = result.as_ref().map(|o| o.success).unwrap_or(false),
            "Command finished"
        );
        result
    }

    async fn handle_generate(
        &self,
        request: &FacetSelection,
        caller: Option<&str>,
        format: OutputFormat,
    ) -> Result<CommandOutput, ApiError> {
        if !request.is_known() {
            warn!(
                industry = %request.industry,
                project_type = %request.project_type,
                difficulty = %request.difficulty,
                "Facet selection contains values outside the known lists"
            );
        }

        let envelope = self.orchestrator()?.generate_idea(request, caller).await;

        let text = match format {
            OutputFormat::Json => format_envelope_json(&envelope),
            OutputFormat::Text => format_envelope_text(&envelope),
        };
        Ok(CommandOutput {
            text,
            success: envelope.success,
        })
    }

    async fn handle_models(
        &self,
        probe: bool,
        format: OutputFormat,
    ) -> Result<CommandOutput, ApiError> {
        let catalog = ModelCatalog::from_settings(&self.config.catalog)?;
        let default_model = catalog.default_model().to_string();

        let mut rows: Vec<ModelStatus> = catalog
            .models()
            .iter()
            .map(|model| ModelStatus {
                model: model.clone(),
                default: *model == default_model,
                live: None,
            })
            .collect();

        if probe {
            let selector = ModelSelector::new(
                catalog,
                self.backend()?,
                self.config.orchestrator.probe_prompt.clone(),
                self.config.orchestrator.probe_timeout(),
            );
            for row in rows.iter_mut() {
                row.live = Some(selector.probe_liveness(&row.model).await);
            }
        }

        Ok(CommandOutput::ok(match format {
            OutputFormat::Json => format_models_json(&rows, &default_model),
            OutputFormat::Text => format_models_text(&rows, &default_model),
        }))
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate { .. } => "generate",
        Commands::Models { .. } => "models",
        Commands::Facets { .. } => "facets",
    }
}
