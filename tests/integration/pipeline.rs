//! End-to-end request handling: classification, routing and orchestration.

use std::sync::Arc;
use std::time::Duration;
use zone_agent::handlers::StocksHandler;
use zone_agent::intent::{Domain, IntentTag};
use zone_agent::{Role, RuntimeEvent, ViewMode};

use crate::helpers::{Delayed, Unreachable, assistant_with, wait_for};

#[tokio::test]
async fn multi_intent_keeps_detection_order_when_first_is_slowest() {
    let (assistant, _, _) = assistant_with(vec![
        Arc::new(Delayed {
            domain: Domain::Stocks,
            delay: Duration::from_millis(200),
        }),
        Arc::new(Delayed {
            domain: Domain::Weather,
            delay: Duration::from_millis(0),
        }),
    ]);
    let mut events = assistant.subscribe();

    let response = assistant.submit("weather and stocks").await;

    let tags: Vec<_> = response.fragments.iter().map(|f| f.tag.clone()).collect();
    assert_eq!(
        tags,
        vec![
            IntentTag::Domain {
                domain: Domain::Stocks
            },
            IntentTag::Domain {
                domain: Domain::Weather
            },
        ]
    );
    assert!(!response.degraded);

    // Weather settles first even though it renders second.
    let first = wait_for(&mut events, |e| matches!(e, RuntimeEvent::FragmentSettled { .. }))
        .await
        .unwrap();
    assert!(matches!(first, RuntimeEvent::FragmentSettled { index: 1, .. }));
}

#[tokio::test]
async fn partial_failure_renders_placeholder_in_place() {
    let (assistant, _, _) = assistant_with(vec![
        Arc::new(StocksHandler::new(
            zone_agent::config::HandlersConfig::default().market_insights,
        )),
        Arc::new(Unreachable(Domain::Weather)),
    ]);

    let response = assistant.submit("stocks and weather").await;

    assert_eq!(response.fragments.len(), 2);
    assert!(response.fragments[0].ok);
    assert!(!response.fragments[1].ok);
    assert!(response.degraded);
    assert!(response.fragments[1].body.contains("unavailable right now"));

    let history = assistant.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::Agent);
    assert!(history[1].content.contains("unavailable right now"));
}

#[tokio::test]
async fn unknown_request_falls_back_to_zone_prompts() {
    let (assistant, _, _) = assistant_with(Vec::new());
    let response = assistant.submit("purple monkey dishwasher").await;
    assert!(matches!(
        response.fragments[0].tag,
        IntentTag::Fallback { .. }
    ));
    assert!(response.body().contains("What's happening this weekend?"));
}

#[tokio::test]
async fn missing_handler_degrades_instead_of_failing() {
    let (assistant, _, _) = assistant_with(Vec::new());
    let response = assistant.submit("any movies about space").await;
    assert!(response.degraded);
    assert_eq!(assistant.history().len(), 2);
}

#[tokio::test]
async fn focus_mode_twice_acknowledges_without_changing() {
    let (assistant, _, store) = assistant_with(Vec::new());

    let first = assistant.submit("focus mode").await;
    assert!(first.body().starts_with("Focus mode on"));
    assert_eq!(assistant.view_mode(), ViewMode::Focus);
    assert_eq!(assistant.mode_indicator(), "Focus mode");
    assert!(!assistant.chrome().advanced_controls);

    let second = assistant.submit("focus mode").await;
    assert_eq!(second.body(), "Already in Focus mode.");
    assert_eq!(store.view_mode(), ViewMode::Focus);
}

#[tokio::test]
async fn clear_history_leaves_only_the_acknowledgment() {
    let (assistant, _, _) = assistant_with(Vec::new());
    assistant.submit("help").await;
    assistant.submit("clear the chat").await;
    let history = assistant.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "Chat cleared.");
}

#[tokio::test]
async fn open_url_hands_link_to_navigator() {
    let (assistant, navigator, _) = assistant_with(Vec::new());
    assistant.submit("open https://example.com/docs").await;
    assert_eq!(navigator.urls(), vec!["https://example.com/docs".to_owned()]);

    let response = assistant.submit("open example").await;
    assert!(matches!(response.fragments[0].tag, IntentTag::InvalidUrl));
    assert_eq!(navigator.urls().len(), 1);
}
