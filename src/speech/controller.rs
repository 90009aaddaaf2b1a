//! Capture and playback session ownership.
//!
//! At most one capture and one playback session exist at a time. Starting a
//! new session of a kind cancels the previous one; [`SpeechController::cancel`]
//! cancels both and returns to idle in the same step.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{SpeechEvent, SpeechState};
use crate::config::SpeechConfig;
use crate::error::{AgentError, Result};
use crate::runtime::RuntimeEvent;

/// Why a capture session ended without a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionFailure {
    /// Nothing was said before the engine gave up.
    NoSpeech,
    /// The session was stopped (toggle off, barge-in).
    Aborted,
    Other(String),
}

impl RecognitionFailure {
    /// Benign failures reset silently; others are surfaced to the user.
    pub fn is_benign(&self) -> bool {
        matches!(self, RecognitionFailure::NoSpeech | RecognitionFailure::Aborted)
    }
}

/// Speech-to-text engine.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Capture one utterance. Must return promptly once `cancel` fires.
    async fn listen(&self, cancel: CancellationToken) -> std::result::Result<String, RecognitionFailure>;
}

/// Voice selection passed to every [`Synthesizer::speak`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Engine-specific voice name. `None` = engine default.
    pub voice: Option<String>,
    /// Playback rate multiplier.
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 1.0,
        }
    }
}

impl From<&SpeechConfig> for VoiceSettings {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            voice: config.voice.clone(),
            rate: config.rate,
        }
    }
}

/// Text-to-speech engine.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speak `text` with `settings` to completion, or stop early when
    /// `cancel` fires.
    ///
    /// Engine failures should be reported as [`AgentError::Synthesis`].
    async fn speak(
        &self,
        text: &str,
        settings: &VoiceSettings,
        cancel: CancellationToken,
    ) -> Result<()>;
}

/// Outcome of a capture request.
pub enum CaptureStart {
    /// A session started; run `recognizer.listen(token)` and report back
    /// through [`SpeechController::finish_capture`] with `session`.
    Started {
        session: u64,
        token: CancellationToken,
        recognizer: Arc<dyn Recognizer>,
    },
    /// No recognizer. `first` is true only for the first attempt.
    Unavailable { first: bool },
}

/// Outcome of a finished capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    Transcript(String),
    /// Benign failure or a superseded session: nothing to show.
    Silent,
    /// Surface this message to the user.
    Failed(String),
}

/// A started playback; run `synthesizer.speak` and report back through
/// [`SpeechController::finish_playback`].
pub struct Playback {
    pub session: u64,
    pub token: CancellationToken,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub settings: VoiceSettings,
}

#[derive(Default)]
struct Sessions {
    state: SpeechState,
    capture: Option<(u64, CancellationToken)>,
    playback: Option<(u64, CancellationToken)>,
    next_session: u64,
    unavailable_reported: bool,
}

impl Sessions {
    fn next_id(&mut self) -> u64 {
        self.next_session += 1;
        self.next_session
    }

    fn stop_capture(&mut self) {
        if let Some((_, token)) = self.capture.take() {
            token.cancel();
        }
    }

    fn stop_playback(&mut self) {
        if let Some((_, token)) = self.playback.take() {
            token.cancel();
        }
    }
}

pub struct SpeechController {
    recognizer: Option<Arc<dyn Recognizer>>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    voice: VoiceSettings,
    narrate: bool,
    sessions: Mutex<Sessions>,
    events: broadcast::Sender<RuntimeEvent>,
}

impl SpeechController {
    pub fn new(
        recognizer: Option<Arc<dyn Recognizer>>,
        synthesizer: Option<Arc<dyn Synthesizer>>,
        voice: VoiceSettings,
        narrate: bool,
        events: broadcast::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            voice,
            narrate,
            sessions: Mutex::new(Sessions::default()),
            events,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.lock().state
    }

    pub fn capture_active(&self) -> bool {
        self.lock().capture.is_some()
    }

    pub fn playback_active(&self) -> bool {
        self.lock().playback.is_some()
    }

    /// Start a capture session, ending any active capture or playback first.
    pub fn begin_capture(&self) -> CaptureStart {
        let mut sessions = self.lock();
        let Some(recognizer) = self.recognizer.clone() else {
            let first = !sessions.unavailable_reported;
            sessions.unavailable_reported = true;
            if first {
                info!("{}", AgentError::RecognitionUnavailable);
            }
            return CaptureStart::Unavailable { first };
        };
        sessions.stop_capture();
        sessions.stop_playback();
        let session = sessions.next_id();
        let token = CancellationToken::new();
        sessions.capture = Some((session, token.clone()));
        self.apply(&mut sessions, SpeechEvent::StartCapture);
        debug!(session, "capture started");
        CaptureStart::Started {
            session,
            token,
            recognizer,
        }
    }

    /// Stop the active capture session (toggle off).
    pub fn stop_capture(&self) {
        let mut sessions = self.lock();
        if sessions.capture.is_some() {
            sessions.stop_capture();
            self.apply(&mut sessions, SpeechEvent::StopCapture);
        }
    }

    /// Report the end of capture `session`.
    pub fn finish_capture(
        &self,
        session: u64,
        outcome: std::result::Result<String, RecognitionFailure>,
    ) -> CaptureResult {
        let mut sessions = self.lock();
        if sessions.capture.as_ref().map(|(id, _)| *id) != Some(session) {
            debug!(session, "ignoring result of a superseded capture");
            return CaptureResult::Silent;
        }
        sessions.capture = None;
        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                self.apply(&mut sessions, SpeechEvent::Transcript);
                CaptureResult::Transcript(text)
            }
            Ok(_) => {
                self.apply(&mut sessions, SpeechEvent::CaptureFailed);
                CaptureResult::Silent
            }
            Err(failure) if failure.is_benign() => {
                debug!(?failure, "capture ended without speech");
                self.apply(&mut sessions, SpeechEvent::CaptureFailed);
                CaptureResult::Silent
            }
            Err(failure) => {
                let message = match failure {
                    RecognitionFailure::Other(message) => message,
                    other => format!("{other:?}"),
                };
                warn!("capture failed: {message}");
                self.apply(&mut sessions, SpeechEvent::CaptureFailed);
                CaptureResult::Failed(AgentError::Recognition(message).to_string())
            }
        }
    }

    /// Typed input is being processed. An open capture is dropped: the
    /// typed request replaces whatever was being said.
    pub fn begin_thinking(&self) {
        let mut sessions = self.lock();
        if sessions.capture.is_some() {
            sessions.stop_capture();
            self.apply(&mut sessions, SpeechEvent::StopCapture);
        }
        sessions.stop_playback();
        self.apply(&mut sessions, SpeechEvent::Submitted);
    }

    /// Move out of `Thinking` for a response. Returns a playback to run when
    /// the narration should be spoken.
    pub fn respond(&self, narration: Option<&str>) -> Option<Playback> {
        let mut sessions = self.lock();
        let speak = self.narrate && narration.is_some_and(|n| !n.trim().is_empty());
        let Some(synthesizer) = self.synthesizer.clone().filter(|_| speak) else {
            self.apply(&mut sessions, SpeechEvent::ResponseReady { narrate: false });
            return None;
        };
        sessions.stop_playback();
        let session = sessions.next_id();
        let token = CancellationToken::new();
        sessions.playback = Some((session, token.clone()));
        self.apply(&mut sessions, SpeechEvent::ResponseReady { narrate: true });
        Some(Playback {
            session,
            token,
            synthesizer,
            settings: self.voice.clone(),
        })
    }

    /// Report the end of playback `session`.
    pub fn finish_playback(&self, session: u64) {
        let mut sessions = self.lock();
        if sessions.playback.as_ref().map(|(id, _)| *id) == Some(session) {
            sessions.playback = None;
            self.apply(&mut sessions, SpeechEvent::NarrationEnded);
        }
    }

    /// Abort capture and playback and return to idle.
    pub fn cancel(&self) {
        let mut sessions = self.lock();
        sessions.stop_capture();
        sessions.stop_playback();
        self.apply(&mut sessions, SpeechEvent::Cancel);
    }

    fn apply(&self, sessions: &mut Sessions, event: SpeechEvent) {
        let Some(next) = sessions.state.on(event) else {
            debug!(state = %sessions.state, ?event, "speech event ignored");
            return;
        };
        if next != sessions.state {
            debug!(from = %sessions.state, to = %next, "speech state");
            sessions.state = next;
            let _ = self.events.send(RuntimeEvent::SpeechState(next));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Run `playback` to completion or cancellation, then report back.
pub async fn run_playback(controller: Arc<SpeechController>, playback: Playback, text: String) {
    let Playback {
        session,
        token,
        synthesizer,
        settings,
    } = playback;
    tokio::select! {
        result = synthesizer.speak(&text, &settings, token.clone()) => {
            if let Err(e) = result {
                let e = match e {
                    AgentError::Synthesis(_) => e,
                    other => AgentError::Synthesis(other.to_string()),
                };
                warn!(session, "narration failed: {e}");
            }
        }
        () = token.cancelled() => debug!(session, "narration cancelled"),
    }
    controller.finish_playback(session);
}

/// Run one capture session and report back.
///
/// A session that produces nothing within `limit` ends as
/// [`RecognitionFailure::NoSpeech`]. A zero `limit` waits indefinitely.
pub async fn run_capture(
    controller: Arc<SpeechController>,
    session: u64,
    token: CancellationToken,
    recognizer: Arc<dyn Recognizer>,
    limit: Duration,
) -> CaptureResult {
    let listen = async {
        if limit.is_zero() {
            return recognizer.listen(token.clone()).await;
        }
        match tokio::time::timeout(limit, recognizer.listen(token.clone())).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(session, "capture timed out");
                Err(RecognitionFailure::NoSpeech)
            }
        }
    };
    let outcome = tokio::select! {
        outcome = listen => outcome,
        () = token.cancelled() => Err(RecognitionFailure::Aborted),
    };
    controller.finish_capture(session, outcome)
}
