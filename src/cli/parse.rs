//! CLI parse: clap types for ideagen. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ideagen CLI - Capstone project idea generator
#[derive(Parser)]
#[command(name = "ideagen")]
#[command(about = "Generate structured capstone project ideas with a generative model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ is looked up here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one capstone project idea
    Generate {
        /// Industry, e.g. "Healthcare"
        #[arg(long)]
        industry: String,
        /// Project type, e.g. "Web App"
        #[arg(long)]
        project_type: String,
        /// Difficulty: Beginner, Intermediate or Advanced
        #[arg(long)]
        difficulty: String,
        /// Caller id used for rate limiting (default: anonymous)
        #[arg(long)]
        caller: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the model catalog
    Models {
        /// Probe each model's liveness
        #[arg(long)]
        probe: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List known industries, project types and difficulty levels
    Facets {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
