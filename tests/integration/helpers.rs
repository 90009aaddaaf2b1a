//! Shared fixtures for integration tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use zone_agent::handlers::{Handler, HandlerContext, HandlerRegistry};
use zone_agent::intent::{Domain, IntentTag, Slots};
use zone_agent::speech::{Synthesizer, VoiceSettings};
use zone_agent::store::StateStore;
use zone_agent::{AgentConfig, Assistant, Fragment, RecordingNavigator, RuntimeEvent};

/// Replies with `"<domain> ready"` after `delay`.
pub(crate) struct Delayed {
    pub domain: Domain,
    pub delay: Duration,
}

#[async_trait]
impl Handler for Delayed {
    fn domain(&self) -> Domain {
        self.domain
    }

    async fn handle(&self, _slots: &Slots, _ctx: &HandlerContext) -> zone_agent::Result<Fragment> {
        tokio::time::sleep(self.delay).await;
        Ok(Fragment::ok(
            IntentTag::Domain {
                domain: self.domain,
            },
            format!("{} ready", self.domain),
        ))
    }
}

/// Always fails like an unreachable source.
pub(crate) struct Unreachable(pub Domain);

#[async_trait]
impl Handler for Unreachable {
    fn domain(&self) -> Domain {
        self.0
    }

    async fn handle(&self, _slots: &Slots, _ctx: &HandlerContext) -> zone_agent::Result<Fragment> {
        Err(zone_sources::SourceError::Http("connection refused".into()).into())
    }
}

/// Speaks until cancelled, keeping every playback token it was handed.
#[derive(Default)]
pub(crate) struct EndlessVoice {
    tokens: Mutex<Vec<CancellationToken>>,
}

impl EndlessVoice {
    /// Whether playback number `n` (zero-based) was cancelled.
    pub fn interrupted(&self, n: usize) -> bool {
        self.tokens.lock().unwrap()[n].is_cancelled()
    }
}

#[async_trait]
impl Synthesizer for EndlessVoice {
    async fn speak(
        &self,
        _text: &str,
        _settings: &VoiceSettings,
        cancel: CancellationToken,
    ) -> zone_agent::Result<()> {
        self.tokens.lock().unwrap().push(cancel.clone());
        cancel.cancelled().await;
        Ok(())
    }
}

pub(crate) fn quick_config() -> AgentConfig {
    let mut config = AgentConfig::default();
    config.navigation.commit_delay_ms = 50;
    config.orchestrator.handler_timeout_ms = 1_000;
    config
}

/// Assistant with the given handlers, an in-memory store and a recording navigator.
pub(crate) fn assistant_with(
    handlers: Vec<Arc<dyn Handler>>,
) -> (Assistant, Arc<RecordingNavigator>, Arc<StateStore>) {
    let mut registry = HandlerRegistry::new();
    for handler in handlers {
        registry.register(handler);
    }
    let navigator = Arc::new(RecordingNavigator::new());
    let store = Arc::new(StateStore::in_memory());
    let assistant = Assistant::builder(quick_config())
        .handlers(registry)
        .navigator(navigator.clone())
        .store(Arc::clone(&store))
        .build()
        .expect("build assistant");
    (assistant, navigator, store)
}

/// Wait for the first event matching `pred`, up to two seconds.
pub(crate) async fn wait_for<F>(rx: &mut broadcast::Receiver<RuntimeEvent>, mut pred: F) -> Option<RuntimeEvent>
where
    F: FnMut(&RuntimeEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}
