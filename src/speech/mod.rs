//! Speech I/O: capture (speech-to-text) and playback (text-to-speech)
//! sessions with global barge-in cancellation.
//!
//! The engines themselves are external; they plug in through the
//! [`Recognizer`] and [`Synthesizer`] traits.

pub mod controller;
pub mod state;

pub use controller::{
    CaptureResult, CaptureStart, Playback, RecognitionFailure, Recognizer, SpeechController,
    Synthesizer, VoiceSettings, run_capture, run_playback,
};
pub use state::{SpeechEvent, SpeechState};
