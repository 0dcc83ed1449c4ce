//! Rate limiting through the orchestrator boundary

use super::test_utils::{idea_json, Reply, StubBackend};
use chrono::{DateTime, Duration as ChronoDuration};
use ideagen::config::IdeagenConfig;
use ideagen::rate_limit::{InMemoryRateLimitStore, ManualClock, RateLimitStore, RateLimiter};
use ideagen::{FacetSelection, Orchestrator};
use std::sync::Arc;

fn request() -> FacetSelection {
    FacetSelection::new("Finance", "Mobile App", "Advanced")
}

fn script(n: usize) -> StubBackend {
    StubBackend::scripted((0..n).map(|_| Reply::Text(idea_json("Advanced"))).collect())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burst_admits_exactly_one() {
    let orchestrator = Arc::new(Orchestrator::from_config(&IdeagenConfig::default(), Arc::new(script(16))).unwrap());

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .generate_idea(&request(), Some("burst-caller"))
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    let mut reset_times = Vec::new();
    for handle in handles {
        let envelope = handle.await.unwrap();
        if envelope.success {
            admitted += 1;
        } else {
            assert!(envelope.data.is_none());
            reset_times.push(envelope.reset_time.expect("denials carry resetTime"));
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(reset_times.len(), 11);
    assert!(reset_times.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_window_expiry_readmits_caller() {
    let start = DateTime::from_timestamp(1_750_000_000, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let store = Arc::new(InMemoryRateLimitStore::new());
    let limiter = RateLimiter::new(store.clone(), clock.clone(), ChronoDuration::seconds(180), 1);

    let config = IdeagenConfig::default();
    let backend = Arc::new(script(2));
    let selector = ideagen::catalog::ModelSelector::new(
        ideagen::catalog::ModelCatalog::from_settings(&config.catalog).unwrap(),
        backend,
        config.orchestrator.probe_prompt.clone(),
        config.orchestrator.probe_timeout(),
    );
    let orchestrator = Orchestrator::new(limiter, selector, config.orchestrator.generation_timeout());

    assert!(orchestrator.generate_idea(&request(), None).await.success);

    clock.advance(ChronoDuration::seconds(180));
    let denied = orchestrator.generate_idea(&request(), None).await;
    assert_eq!(
        denied.error.as_deref(),
        Some("Rate limit exceeded. Please wait 0 seconds before trying again.")
    );
    assert_eq!(denied.reset_time, Some(start + ChronoDuration::seconds(180)));

    clock.advance(ChronoDuration::milliseconds(1));
    assert!(orchestrator.generate_idea(&request(), None).await.success);

    let record = store.get("anonymous").unwrap();
    assert!(record.window_reset_at > start + ChronoDuration::seconds(180));
    assert_eq!(record.count, 1);
}

#[tokio::test]
async fn test_denied_request_does_not_touch_backend() {
    let backend = script(1);
    let generations = backend.generations.clone();
    let probes = backend.probes.clone();
    let orchestrator = Orchestrator::from_config(&IdeagenConfig::default(), Arc::new(backend)).unwrap();

    assert!(orchestrator.generate_idea(&request(), Some("u")).await.success);
    let (gen_before, probe_before) = (generations.lock().len(), probes.lock().len());

    let denied = orchestrator.generate_idea(&request(), Some("u")).await;
    assert!(!denied.success);
    assert_eq!(generations.lock().len(), gen_before);
    assert_eq!(probes.lock().len(), probe_before);
}
