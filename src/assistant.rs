//! The assistant facade: one entry point per user action.
//!
//! Every non-empty input appends exactly one user message and, unless it is
//! superseded by a cancel, exactly one agent message. Responses that settle
//! after a cancel are discarded.

use chrono::{Local, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zone_sources::SourceClients;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::history::{ChatHistory, ChatMessage};
use crate::intent::{IntentClassifier, IntentTag, Utterance};
use crate::orchestrator::Orchestrator;
use crate::render::{Fragment, Response};
use crate::router::{CommandRouter, Navigator, PendingNavigation, RecordingNavigator};
use crate::runtime::RuntimeEvent;
use crate::session::{LocalSession, SessionBoundary};
use crate::speech::{
    CaptureResult, CaptureStart, Recognizer, SpeechController, SpeechState, Synthesizer,
    VoiceSettings, run_capture, run_playback,
};
use crate::store::StateStore;
use crate::view_mode::{ChromeVisibility, ViewMode, ViewModeMachine};
use crate::zone::{ZoneContext, ZoneRegistry};

const EVENT_CAPACITY: usize = 256;

/// Shown once when voice input is requested on a surface without it.
pub const VOICE_UNAVAILABLE_MESSAGE: &str =
    "Voice input isn't available here. Type your request in the chat box instead.";

/// Wires the assistant's collaborators. Anything not supplied gets a default.
pub struct AssistantBuilder {
    config: AgentConfig,
    session: Option<Arc<dyn SessionBoundary>>,
    navigator: Option<Arc<dyn Navigator>>,
    recognizer: Option<Arc<dyn Recognizer>>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    handlers: Option<HandlerRegistry>,
    store: Option<Arc<StateStore>>,
}

impl AssistantBuilder {
    pub fn session(mut self, session: Arc<dyn SessionBoundary>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Replace the standard handlers, which otherwise talk to `config.sources`.
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Share an existing store. Otherwise the store at `config.state_path()`
    /// is opened.
    pub fn store(mut self, store: Arc<StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// # Errors
    ///
    /// Returns [`crate::AgentError::Config`] for invalid configuration or
    /// when the source clients cannot be built.
    pub fn build(self) -> Result<Assistant> {
        let config = self.config;
        config.validate()?;

        let zones = Arc::new(ZoneRegistry::new(config.zones.clone()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(StateStore::open(Some(config.state_path()))));
        let handlers = match self.handlers {
            Some(handlers) => handlers,
            None => {
                let clients = SourceClients::new(&config.sources)
                    .map_err(|e| crate::AgentError::Config(e.to_string()))?;
                HandlerRegistry::standard(
                    &config.handlers,
                    &clients,
                    Arc::clone(&store),
                    Arc::clone(&zones),
                )
            }
        };

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let history = Arc::new(Mutex::new(ChatHistory::new()));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(RecordingNavigator::new()));
        let view_mode = ViewModeMachine::new(Arc::clone(&store));
        let router = CommandRouter::new(
            Arc::clone(&zones),
            handlers,
            Orchestrator::new(config.orchestrator.handler_timeout_ms, events.clone()),
            view_mode.clone(),
            Arc::clone(&history),
            Arc::clone(&navigator),
            events.clone(),
            Duration::from_millis(config.navigation.commit_delay_ms),
        );
        let speech = Arc::new(SpeechController::new(
            self.recognizer,
            self.synthesizer,
            VoiceSettings::from(&config.speech),
            config.speech.narrate,
            events.clone(),
        ));
        let current_zone = zones.home().id.clone();
        info!(
            zones = zones.iter().count(),
            mode = %view_mode.current(),
            "assistant ready"
        );

        Ok(Assistant {
            inner: Arc::new(Inner {
                classifier: IntentClassifier::new(&config.classifier),
                zones,
                router,
                speech,
                view_mode,
                store,
                history,
                session: self
                    .session
                    .unwrap_or_else(|| Arc::new(LocalSession::new())),
                navigator,
                events,
                current_zone: Mutex::new(current_zone),
                epoch: AtomicU64::new(0),
                pending: Mutex::new(None),
                next_navigation: AtomicU64::new(0),
                capture_limit: Duration::from_secs(u64::from(config.speech.capture_timeout_s)),
            }),
        })
    }
}

struct Inner {
    classifier: IntentClassifier,
    zones: Arc<ZoneRegistry>,
    router: CommandRouter,
    speech: Arc<SpeechController>,
    view_mode: ViewModeMachine,
    store: Arc<StateStore>,
    history: Arc<Mutex<ChatHistory>>,
    session: Arc<dyn SessionBoundary>,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<RuntimeEvent>,
    current_zone: Mutex<String>,
    /// Bumped by every cancel; responses from an older epoch are dropped.
    epoch: AtomicU64,
    pending: Mutex<Option<(u64, PendingNavigation, CancellationToken)>>,
    next_navigation: AtomicU64,
    capture_limit: Duration,
}

/// Cheap to clone; all clones share one assistant.
#[derive(Clone)]
pub struct Assistant {
    inner: Arc<Inner>,
}

/// Result of [`Assistant::toggle_capture`].
pub enum CaptureToggle {
    /// A capture session started. The handle resolves to the response for
    /// the transcript, or `None` when nothing was heard.
    Started(JoinHandle<Option<Response>>),
    /// The active capture session was stopped.
    Stopped,
    /// No recognizer on this surface.
    Unavailable,
}

impl Assistant {
    pub fn builder(config: AgentConfig) -> AssistantBuilder {
        AssistantBuilder {
            config,
            session: None,
            navigator: None,
            recognizer: None,
            synthesizer: None,
            handlers: None,
            store: None,
        }
    }

    /// Observe runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.inner.events.subscribe()
    }

    /// Handle typed input.
    pub async fn submit(&self, text: &str) -> Response {
        self.process(Utterance::typed(text)).await
    }

    /// Handle a final speech transcript.
    pub async fn handle_transcript(&self, text: &str) -> Response {
        self.process(Utterance::spoken(text)).await
    }

    async fn process(&self, utterance: Utterance) -> Response {
        let zone = self.current_zone();
        let intents = self.inner.classifier.classify(&utterance, &zone);
        if intents.is_empty() {
            return Response::default();
        }
        self.append_user(&utterance.text);

        if intents.iter().any(|i| i.tag == IntentTag::Cancel) {
            self.cancel();
            let response = Response::silent(Fragment::ok(IntentTag::Cancel, "Okay, stopped."));
            self.append_agent(&response.body());
            return response;
        }

        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        if matches!(utterance.source, crate::intent::UtteranceSource::Typed) {
            self.inner.speech.begin_thinking();
        }
        debug!(
            zone = %zone.id,
            intents = ?intents.iter().map(|i| i.tag.name()).collect::<Vec<_>>(),
            "classified"
        );

        let ctx = HandlerContext {
            zone,
            identity: self.inner.session.current_identity(),
            today: Local::now().date_naive(),
            state: self.inner.store.snapshot(),
        };
        let response = self.inner.router.route(intents, &ctx).await;

        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            info!("discarding response that settled after a cancel");
            return Response::default();
        }

        self.append_agent(&response.body());
        if let Some(navigation) = &response.navigation {
            self.schedule_navigation(navigation.clone());
        }
        if let Some(playback) = self.inner.speech.respond(response.narration.as_deref()) {
            let text = response.narration.clone().unwrap_or_default();
            tokio::spawn(run_playback(Arc::clone(&self.inner.speech), playback, text));
        }
        response
    }

    /// Stop narration and capture, drop in-flight responses and any pending
    /// navigation.
    pub fn cancel(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.speech.cancel();
        let pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some((_, navigation, token)) = pending {
            token.cancel();
            info!(zone = %navigation.zone_id, "pending navigation cancelled");
            let _ = self.inner.events.send(RuntimeEvent::NavigationCancelled {
                zone: navigation.zone_id,
            });
        }
    }

    /// Microphone toggle: start a capture session, or stop the active one.
    pub fn toggle_capture(&self) -> CaptureToggle {
        if self.inner.speech.capture_active() {
            self.inner.speech.stop_capture();
            return CaptureToggle::Stopped;
        }
        match self.inner.speech.begin_capture() {
            CaptureStart::Started {
                session,
                token,
                recognizer,
            } => {
                let this = self.clone();
                let speech = Arc::clone(&self.inner.speech);
                CaptureToggle::Started(tokio::spawn(async move {
                    let limit = this.inner.capture_limit;
                    match run_capture(speech, session, token, recognizer, limit).await {
                        CaptureResult::Transcript(text) => Some(this.handle_transcript(&text).await),
                        CaptureResult::Silent => None,
                        CaptureResult::Failed(message) => {
                            this.append_agent(&message);
                            None
                        }
                    }
                }))
            }
            CaptureStart::Unavailable { first } => {
                if first {
                    self.append_agent(VOICE_UNAVAILABLE_MESSAGE);
                    let _ = self
                        .inner
                        .events
                        .send(RuntimeEvent::Notice(VOICE_UNAVAILABLE_MESSAGE.to_owned()));
                }
                CaptureToggle::Unavailable
            }
        }
    }

    fn schedule_navigation(&self, navigation: PendingNavigation) {
        let id = self.inner.next_navigation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let previous = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace((id, navigation.clone(), token.clone()));
        if let Some((_, superseded, previous)) = previous {
            debug!(zone = %superseded.zone_id, "navigation superseded");
            previous.cancel();
        }
        let _ = self.inner.events.send(RuntimeEvent::NavigationAnnounced {
            zone: navigation.zone_id.clone(),
            path: navigation.path.clone(),
        });

        let this = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(navigation.delay) => this.commit_navigation(id),
            }
        });
    }

    fn commit_navigation(&self, id: u64) {
        let navigation = {
            let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
            match pending.take() {
                Some((pending_id, navigation, _)) if pending_id == id => navigation,
                other => {
                    *pending = other;
                    return;
                }
            }
        };

        self.inner.navigator.navigate(&navigation.path);
        *self
            .inner
            .current_zone
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = navigation.zone_id.clone();
        info!(zone = %navigation.zone_id, path = %navigation.path, "navigation committed");

        match self.inner.store.record_visit(&navigation.zone_id, Utc::now()) {
            Ok(progress) => {
                if let Some(identity) = self.inner.session.current_identity() {
                    let state = self.inner.store.snapshot();
                    let blob = json!({
                        "zone": navigation.zone_id,
                        "visits": progress.visits,
                        "zones_visited": state.progress.len(),
                        "total_visits": state.total_visits(),
                    });
                    self.inner.session.persist_progress(&identity, blob);
                }
            }
            Err(e) => warn!("cannot record zone visit: {e}"),
        }

        let _ = self.inner.events.send(RuntimeEvent::NavigationCommitted {
            zone: navigation.zone_id,
            path: navigation.path,
        });
    }

    fn append_user(&self, text: &str) {
        let message = self.lock_history().push_user(text);
        let _ = self.inner.events.send(RuntimeEvent::MessageAppended(message));
    }

    fn append_agent(&self, text: &str) {
        let message = self.lock_history().push_agent(text);
        let _ = self.inner.events.send(RuntimeEvent::MessageAppended(message));
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, ChatHistory> {
        self.inner.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the chat transcript.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock_history().messages().to_vec()
    }

    pub fn current_zone(&self) -> ZoneContext {
        let id = self
            .inner
            .current_zone
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        self.inner.zones.current_or_home(Some(&id)).clone()
    }

    /// Announced navigation that has not committed yet.
    pub fn pending_navigation(&self) -> Option<PendingNavigation> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, navigation, _)| navigation.clone())
    }

    pub fn view_mode(&self) -> ViewMode {
        self.inner.view_mode.current()
    }

    /// Label for the always-visible mode indicator.
    pub fn mode_indicator(&self) -> String {
        self.inner.view_mode.indicator()
    }

    pub fn chrome(&self) -> ChromeVisibility {
        self.inner.view_mode.chrome()
    }

    pub fn speech_state(&self) -> SpeechState {
        self.inner.speech.state()
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.inner.zones
    }
}
