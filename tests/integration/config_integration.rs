//! Integration tests for the configuration system

use super::test_utils::with_isolated_env;
use ideagen::config::{ConfigLoader, IdeagenConfig};
use ideagen::provider::GeminiBackend;
use ideagen::ApiError;
use tempfile::TempDir;

#[test]
fn test_global_workspace_and_env_layers() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let global_dir = test_dir.path().join("xdg").join("ideagen");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        r#"
[rate_limit]
window_secs = 600
max_requests = 3

[orchestrator]
probe_timeout_secs = 5
"#,
    )
    .unwrap();

    let config_dir = workspace.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[rate_limit]
window_secs = 120
"#,
    )
    .unwrap();
    std::fs::write(
        config_dir.join("staging.toml"),
        r#"
[catalog]
default_model = "gemini-2.0-flash"
"#,
    )
    .unwrap();

    let config = with_isolated_env(
        &test_dir,
        &[
            ("IDEAGEN_ENV", "staging"),
            ("IDEAGEN__ORCHESTRATOR__GENERATION_TIMEOUT_SECS", "45"),
        ],
        || ConfigLoader::load(workspace.path()),
    )
    .unwrap();

    // workspace beats global, global beats defaults
    assert_eq!(config.rate_limit.window_secs, 120);
    assert_eq!(config.rate_limit.max_requests, 3);
    assert_eq!(config.orchestrator.probe_timeout_secs, 5);
    assert_eq!(config.catalog.default_model, "gemini-2.0-flash");
    assert_eq!(config.orchestrator.generation_timeout_secs, 45);
    assert_eq!(config.catalog.models.len(), 9);
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_model_list_override() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_isolated_env(
        &test_dir,
        &[("IDEAGEN__CATALOG__MODELS", "gemini-2.5-pro,gemini-2.5-flash")],
        || ConfigLoader::load(workspace.path()),
    )
    .unwrap();

    assert_eq!(
        config.catalog.models,
        vec!["gemini-2.5-pro".to_string(), "gemini-2.5-flash".to_string()]
    );
}

#[test]
fn test_no_files_yields_defaults() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config =
        with_isolated_env(&test_dir, &[], || ConfigLoader::load(workspace.path())).unwrap();
    let defaults = IdeagenConfig::default();
    assert_eq!(config.rate_limit.window_secs, defaults.rate_limit.window_secs);
    assert_eq!(config.catalog.models, defaults.catalog.models);
    assert_eq!(config.provider.base_url, defaults.provider.base_url);
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_global_config_path_honours_xdg() {
    let test_dir = TempDir::new().unwrap();
    let path = with_isolated_env(&test_dir, &[], ConfigLoader::global_config_path).unwrap();
    assert_eq!(
        path,
        test_dir.path().join("xdg").join("ideagen").join("config.toml")
    );
}

#[test]
fn test_missing_credential_is_startup_error() {
    let mut config = IdeagenConfig::default();
    config.provider.api_key = None;
    config.provider.api_key_env = "IDEAGEN_TEST_KEY_THAT_IS_NEVER_SET".to_string();

    match GeminiBackend::from_settings(&config.provider) {
        Err(ApiError::MissingCredential(var)) => {
            assert_eq!(var, "IDEAGEN_TEST_KEY_THAT_IS_NEVER_SET")
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("backend built without a credential"),
    }
}

#[test]
fn test_config_file_credential_builds_backend() {
    let mut config = IdeagenConfig::default();
    config.provider.api_key = Some("test-key".to_string());
    assert!(GeminiBackend::from_settings(&config.provider).is_ok());
}
