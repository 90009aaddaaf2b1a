//! Announce-then-commit navigation.

use std::sync::Arc;
use zone_agent::handlers::{HandlerRegistry, ProgressHandler};
use zone_agent::store::StateStore;
use zone_agent::{
    Assistant, LocalSession, RecordingNavigator, RuntimeEvent, SessionBoundary, ZoneRegistry,
};
use zone_sources::Identity;

use crate::helpers::{assistant_with, quick_config, wait_for};

#[tokio::test]
async fn navigation_commits_after_the_announcement() {
    let (assistant, navigator, store) = assistant_with(Vec::new());
    let mut events = assistant.subscribe();

    let response = assistant.submit("go to weather").await;
    assert!(response.body().contains("Weather Station"));
    assert!(response.narration.is_some());
    assert!(navigator.paths().is_empty());
    assert_eq!(assistant.pending_navigation().unwrap().zone_id, "weather");

    let committed = wait_for(&mut events, |e| {
        matches!(e, RuntimeEvent::NavigationCommitted { .. })
    })
    .await;
    assert!(committed.is_some());
    assert_eq!(navigator.paths(), vec!["/weather".to_owned()]);
    assert_eq!(assistant.current_zone().id, "weather");
    assert!(assistant.pending_navigation().is_none());
    assert_eq!(store.snapshot().progress["weather"].visits, 1);
}

#[tokio::test]
async fn unknown_zone_lists_valid_names() {
    let (assistant, navigator, _) = assistant_with(Vec::new());
    let response = assistant.submit("go to nonexistentzone").await;
    assert!(response.navigation.is_none());
    assert!(response.body().contains("Central Hub"));
    assert!(response.body().contains("Cinema"));
    assert!(assistant.pending_navigation().is_none());
    assert!(navigator.paths().is_empty());
}

#[tokio::test]
async fn stop_cancels_a_pending_navigation() {
    let mut config = quick_config();
    config.navigation.commit_delay_ms = 500;
    let navigator = Arc::new(RecordingNavigator::new());
    let assistant = Assistant::builder(config)
        .handlers(HandlerRegistry::new())
        .navigator(navigator.clone())
        .store(Arc::new(StateStore::in_memory()))
        .build()
        .unwrap();
    let mut events = assistant.subscribe();

    assistant.submit("take me to the cinema").await;
    assistant.submit("never mind").await;

    let cancelled = wait_for(&mut events, |e| {
        matches!(e, RuntimeEvent::NavigationCancelled { .. })
    })
    .await;
    assert!(cancelled.is_some());
    tokio::time::sleep(std::time::Duration::from_millis(700)).await;
    assert!(navigator.paths().is_empty());
    assert_eq!(assistant.current_zone().id, "hub");
}

#[tokio::test]
async fn signed_in_visits_are_synced_and_reported() {
    let zones = Arc::new(ZoneRegistry::builtin());
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(ProgressHandler::new(Arc::clone(&zones))));
    let session = Arc::new(LocalSession::signed_in(Identity::local("ada", "Ada")));
    let assistant = Assistant::builder(quick_config())
        .handlers(registry)
        .session(Arc::clone(&session) as Arc<dyn SessionBoundary>)
        .store(Arc::new(StateStore::in_memory()))
        .build()
        .unwrap();
    let mut events = assistant.subscribe();

    assistant.submit("go to weather").await;
    wait_for(&mut events, |e| {
        matches!(e, RuntimeEvent::NavigationCommitted { .. })
    })
    .await
    .unwrap();

    let pushed = session.pushed();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].0, "ada");
    assert_eq!(pushed[0].1["zone"], "weather");
    assert_eq!(pushed[0].1["visits"], 1);

    let response = assistant.submit("show my progress").await;
    assert!(response.body().contains("Zones explored: 1 of 7"));
    assert!(response.body().contains("Weather Station: 1 visit"));
}
