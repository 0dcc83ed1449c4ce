//! CLI route tests with an injected backend

use super::test_utils::{idea_json, Reply, StubBackend};
use clap::Parser;
use ideagen::cli::{Cli, Commands, OutputFormat, RunContext};
use ideagen::config::IdeagenConfig;
use std::sync::Arc;

fn context(backend: StubBackend) -> RunContext {
    let mut config = IdeagenConfig::default();
    config.catalog.models = vec!["m1".to_string(), "m2".to_string()];
    config.catalog.default_model = "m1".to_string();
    RunContext::from_config(config)
        .unwrap()
        .with_backend(Arc::new(backend))
}

fn generate(format: OutputFormat) -> Commands {
    Commands::Generate {
        industry: "Healthcare".to_string(),
        project_type: "Web App".to_string(),
        difficulty: "Beginner".to_string(),
        caller: Some("cli-user".to_string()),
        format,
    }
}

#[tokio::test]
async fn test_generate_json_output() {
    let context = context(StubBackend::scripted(vec![Reply::Text(idea_json("Beginner"))]));
    let output = context.execute(&generate(OutputFormat::Json)).await.unwrap();
    assert!(output.success);

    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["industry"], "Healthcare");
    assert_eq!(value["data"]["projectType"], "Web App");
    assert_eq!(value["data"]["title"], "Farm Sensor Dashboard");
}

#[tokio::test]
async fn test_generate_failure_marks_output_unsuccessful() {
    let context = context(StubBackend::scripted(vec![Reply::Empty, Reply::Empty]));
    let output = context.execute(&generate(OutputFormat::Text)).await.unwrap();
    assert!(!output.success);
    assert!(output.text.contains("All models failed to generate content"));
}

#[tokio::test]
async fn test_second_generate_is_rate_limited() {
    let context = context(StubBackend::scripted(vec![
        Reply::Text(idea_json("Beginner")),
        Reply::Text(idea_json("Beginner")),
    ]));
    assert!(context.execute(&generate(OutputFormat::Json)).await.unwrap().success);

    let output = context.execute(&generate(OutputFormat::Json)).await.unwrap();
    assert!(!output.success);
    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert!(value["resetTime"].is_i64());
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Rate limit exceeded. Please wait"));
}

#[tokio::test]
async fn test_models_probe_reports_liveness() {
    let context = context(StubBackend::default().with_dead(&["m2"]));
    let output = context
        .execute(&Commands::Models {
            probe: true,
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["models"][0]["model"], "m1");
    assert_eq!(value["models"][0]["live"], true);
    assert_eq!(value["models"][0]["default"], true);
    assert_eq!(value["models"][1]["live"], false);
}

#[tokio::test]
async fn test_parsed_facets_command_runs() {
    let cli = Cli::try_parse_from(["ideagen", "facets"]).unwrap();
    let context = RunContext::from_config(IdeagenConfig::default()).unwrap();
    let output = context.execute(&cli.command).await.unwrap();
    assert!(output.success);
    assert!(output.text.contains("Recruitment"));
}
