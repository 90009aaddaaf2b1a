//! Error types for the zone assistant.
//!
//! None of these ever escape [`crate::assistant::Assistant::submit`]: the
//! router and orchestrator turn them into degraded fragments.

/// Top-level error type for the assistant core.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No speech-to-text engine is available on this surface.
    #[error("speech recognition is unavailable")]
    RecognitionUnavailable,

    /// A capture session failed for a non-benign reason.
    #[error("speech recognition error: {0}")]
    Recognition(String),

    /// Speech synthesis failed.
    #[error("speech synthesis error: {0}")]
    Synthesis(String),

    /// A data source call failed or returned something unparsable.
    #[error("network error: {0}")]
    Network(#[from] zone_sources::SourceError),

    /// A handler did not settle within the configured timeout.
    #[error("{0} did not respond in time")]
    HandlerTimeout(String),

    /// A handler task panicked or was aborted.
    #[error("handler failed: {0}")]
    HandlerFailed(String),

    /// No handler is registered for the intent.
    #[error("no handler registered for {0}")]
    NoHandler(String),

    /// Persisted state could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AgentError>;
