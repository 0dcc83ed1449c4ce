//! End-to-end orchestration through the public API with a scripted backend

use super::test_utils::{idea_json, Reply, StubBackend, PROBE_PROMPT};
use chrono::{DateTime, Duration as ChronoDuration};
use ideagen::catalog::{ModelCatalog, ModelSelector};
use ideagen::error::ALL_MODELS_FAILED_MESSAGE;
use ideagen::rate_limit::{InMemoryRateLimitStore, ManualClock, RateLimiter};
use ideagen::types::DifficultyLevel;
use ideagen::{FacetSelection, Orchestrator};
use std::sync::Arc;
use std::time::Duration;

fn orchestrator(models: &[&str], default_model: &str, backend: StubBackend) -> Orchestrator {
    let catalog = ModelCatalog::new(
        models.iter().map(|m| m.to_string()).collect(),
        default_model,
    )
    .unwrap();
    let selector = ModelSelector::new(
        catalog,
        Arc::new(backend),
        PROBE_PROMPT,
        Duration::from_secs(15),
    );
    let limiter = RateLimiter::new(
        Arc::new(InMemoryRateLimitStore::new()),
        Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        )),
        ChronoDuration::seconds(180),
        5,
    );
    Orchestrator::new(limiter, selector, Duration::from_secs(60))
}

fn request() -> FacetSelection {
    FacetSelection::new("Agriculture", "IoT App", "Intermediate")
}

#[tokio::test]
async fn test_facets_come_from_request_not_model() {
    let backend = StubBackend::scripted(vec![Reply::Text(idea_json("Advanced"))]);
    let orchestrator = orchestrator(&["m1", "m2"], "m1", backend);

    let envelope = orchestrator.generate_idea(&request(), Some("student-1")).await;
    assert!(envelope.success);
    let data = envelope.data.unwrap();
    assert_eq!(data.industry, "Agriculture");
    assert_eq!(data.project_type, "IoT App");
    assert_eq!(data.difficulty, "Intermediate");
    assert_eq!(data.idea.difficulty_level, DifficultyLevel::Advanced);
    assert_eq!(data.idea.similar_projects.len(), 5);
}

#[tokio::test]
async fn test_dead_models_are_skipped_by_selection() {
    let backend = StubBackend::scripted(vec![Reply::Text(idea_json("Intermediate"))])
        .with_dead(&["m1", "m2"]);
    let generations = backend.generations.clone();
    let orchestrator = orchestrator(&["m1", "m2", "m3"], "m1", backend);

    assert!(orchestrator.generate_idea(&request(), None).await.success);
    assert_eq!(*generations.lock(), vec!["m3".to_string()]);
}

#[tokio::test]
async fn test_default_model_used_when_nothing_answers_probe() {
    let backend = StubBackend::scripted(vec![Reply::Text(idea_json("Intermediate"))])
        .with_dead(&["m1", "m2"]);
    let generations = backend.generations.clone();
    let probes = backend.probes.clone();
    let orchestrator = orchestrator(&["m1", "m2"], "last-resort", backend);

    assert!(orchestrator.generate_idea(&request(), None).await.success);
    assert_eq!(probes.lock().len(), 2);
    assert_eq!(*generations.lock(), vec!["last-resort".to_string()]);
}

#[tokio::test]
async fn test_quota_error_recovers_on_other_model() {
    let backend = StubBackend::scripted(vec![
        Reply::Quota,
        Reply::Text(format!("```json\n{}\n```", idea_json("Intermediate"))),
    ]);
    let generations = backend.generations.clone();
    let orchestrator = orchestrator(&["m1", "m2"], "m1", backend);

    let envelope = orchestrator.generate_idea(&request(), None).await;
    assert!(envelope.success, "{:?}", envelope.error);
    let models = generations.lock();
    assert_eq!(models.len(), 2);
    assert_ne!(models[0], models[1]);
}

#[tokio::test]
async fn test_two_failures_report_all_models_failed() {
    let backend = StubBackend::scripted(vec![Reply::Empty, Reply::Text("Sorry, no.".into())]);
    let orchestrator = orchestrator(&["m1", "m2", "m3"], "m1", backend);

    let envelope = orchestrator.generate_idea(&request(), None).await;
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.error.as_deref(), Some(ALL_MODELS_FAILED_MESSAGE));

    let json = serde_json::to_value(&envelope).unwrap();
    assert!(json.get("data").is_none());
    assert!(json.get("resetTime").is_none());
}

#[tokio::test]
async fn test_single_model_quota_message_surfaces() {
    let backend = StubBackend::scripted(vec![Reply::Quota]);
    let orchestrator = orchestrator(&["solo"], "solo", backend);

    let envelope = orchestrator.generate_idea(&request(), None).await;
    assert_eq!(
        envelope.error.as_deref(),
        Some("Provider rate limit exceeded: quota exhausted")
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_on_primary_falls_back() {
    let backend = StubBackend::scripted(vec![
        Reply::Hang,
        Reply::Text(idea_json("Intermediate")),
    ]);
    let orchestrator = orchestrator(&["m1", "m2"], "m1", backend);
    assert!(orchestrator.generate_idea(&request(), None).await.success);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_on_both_attempts_fails_cleanly() {
    let backend = StubBackend::scripted(vec![Reply::Hang, Reply::Hang]);
    let orchestrator = orchestrator(&["m1", "m2"], "m1", backend);

    let envelope = orchestrator.generate_idea(&request(), None).await;
    assert_eq!(envelope.error.as_deref(), Some(ALL_MODELS_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_success_envelope_wire_shape() {
    let backend = StubBackend::scripted(vec![Reply::Text(idea_json("Intermediate"))]);
    let orchestrator = orchestrator(&["m1"], "m1", backend);

    let envelope = orchestrator.generate_idea(&request(), None).await;
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert!(json.get("error").is_none());
    let data = &json["data"];
    for key in [
        "title",
        "description",
        "technologyStack",
        "similarProjects",
        "learningOutcomes",
        "difficultyLevel",
        "estimatedHours",
        "prerequisites",
        "industry",
        "projectType",
        "difficulty",
    ] {
        assert!(data.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(data["industry"], "Agriculture");
}
