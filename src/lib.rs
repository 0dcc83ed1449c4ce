//! Ideagen: Capstone Project Idea Generation
//!
//! Turns an industry / project type / difficulty selection into a structured
//! capstone proposal by delegating to a generative text model, with per-caller
//! throttling, model selection with one fallback, and strict parsing of the
//! model's output into a typed schema.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod rate_limit;
pub mod types;

pub use error::{ApiError, GenerationError, ParseError};
pub use orchestrator::Orchestrator;
pub use types::{CapstoneIdea, FacetSelection, GeneratedIdea, ResultEnvelope};
