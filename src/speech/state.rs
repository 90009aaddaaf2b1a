//! Pure speech state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Speaking,
}

/// Inputs that drive [`SpeechState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A capture session starts (replacing any active one).
    StartCapture,
    /// The user toggled the active capture off.
    StopCapture,
    /// The recognizer produced a transcript.
    Transcript,
    /// Capture ended without a transcript (error, no speech, timeout).
    CaptureFailed,
    /// Typed input was submitted.
    Submitted,
    /// A response is ready; `narrate` is false when nothing will be spoken.
    ResponseReady { narrate: bool },
    /// Playback finished on its own.
    NarrationEnded,
    /// Global barge-in.
    Cancel,
}

impl SpeechState {
    /// Next state for `event`, or `None` when the event does not apply.
    pub fn on(self, event: SpeechEvent) -> Option<SpeechState> {
        use SpeechEvent as E;
        use SpeechState as S;

        match (self, event) {
            (_, E::Cancel) => Some(S::Idle),
            (_, E::StartCapture) => Some(S::Listening),
            (S::Listening, E::StopCapture | E::CaptureFailed) => Some(S::Idle),
            (S::Listening, E::Transcript) => Some(S::Thinking),
            (_, E::Submitted) => Some(S::Thinking),
            (S::Thinking | S::Speaking | S::Idle, E::ResponseReady { narrate: true }) => {
                Some(S::Speaking)
            }
            (S::Thinking, E::ResponseReady { narrate: false }) => Some(S::Idle),
            (S::Speaking, E::NarrationEnded) => Some(S::Idle),
            _ => None,
        }
    }
}

impl fmt::Display for SpeechState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpeechState::Idle => "idle",
            SpeechState::Listening => "listening",
            SpeechState::Thinking => "thinking",
            SpeechState::Speaking => "speaking",
        };
        f.write_str(label)
    }
}
