//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Only scalar keys are seeded here; list and section defaults come from the
/// serde defaults on the config structs.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("rate_limit.window_secs", 180)?
        .set_default("rate_limit.max_requests", 1)?
        .set_default("orchestrator.generation_timeout_secs", 60)?
        .set_default("orchestrator.probe_timeout_secs", 15)
}
