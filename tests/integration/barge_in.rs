//! Cancellation stops narration and discards late results.

use std::sync::Arc;
use std::time::Duration;
use zone_agent::handlers::HandlerRegistry;
use zone_agent::intent::Domain;
use zone_agent::speech::SpeechState;
use zone_agent::store::StateStore;
use zone_agent::{Assistant, Role};

use crate::helpers::{Delayed, EndlessVoice, assistant_with, quick_config};

#[tokio::test]
async fn stop_interrupts_narration() {
    let voice = Arc::new(EndlessVoice::default());
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(Delayed {
        domain: Domain::Wellness,
        delay: Duration::ZERO,
    }));
    let assistant = Assistant::builder(quick_config())
        .handlers(registry)
        .synthesizer(voice.clone())
        .store(Arc::new(StateStore::in_memory()))
        .build()
        .unwrap();

    assistant.submit("give me a wellness tip").await;
    assert_eq!(assistant.speech_state(), SpeechState::Speaking);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let response = assistant.submit("stop").await;
    assert!(response.narration.is_none());
    assert_eq!(assistant.speech_state(), SpeechState::Idle);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(voice.interrupted(0));
}

#[tokio::test]
async fn result_settling_after_cancel_is_discarded() {
    let (assistant, _, _) = assistant_with(vec![Arc::new(Delayed {
        domain: Domain::Weather,
        delay: Duration::from_millis(300),
    })]);

    let background = assistant.clone();
    let in_flight = tokio::spawn(async move { background.submit("what's the weather").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assistant.submit("cancel").await;

    let late = in_flight.await.unwrap();
    assert!(late.fragments.is_empty());

    let history = assistant.history();
    let agent: Vec<_> = history.iter().filter(|m| m.role == Role::Agent).collect();
    assert_eq!(history.len(), 3);
    assert_eq!(agent.len(), 1);
    assert_eq!(agent[0].content, "Okay, stopped.");
}

#[tokio::test]
async fn typed_input_interrupts_previous_narration() {
    let voice = Arc::new(EndlessVoice::default());
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(Delayed {
        domain: Domain::Stocks,
        delay: Duration::ZERO,
    }));
    let assistant = Assistant::builder(quick_config())
        .handlers(registry)
        .synthesizer(voice.clone())
        .store(Arc::new(StateStore::in_memory()))
        .build()
        .unwrap();

    assistant.submit("stocks").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assistant.submit("where am i").await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(voice.interrupted(0));
    assert_eq!(assistant.speech_state(), SpeechState::Speaking);
}
