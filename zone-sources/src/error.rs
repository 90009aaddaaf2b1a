//! Error types for the zone-sources crate.
//!
//! Messages are stable and safe to show to users. Credentials and tokens
//! never appear in error text.

/// Errors that can occur while talking to a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status {
        /// Which source produced the status.
        service: &'static str,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the JSON shape we expect.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The source rejected the supplied credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Nothing matched the lookup (e.g. an unknown place name).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid source configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SourceError {
    /// Map a `reqwest` transport error, separating timeouts from other failures.
    pub(crate) fn from_reqwest(service: &'static str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{service} did not respond in time"))
        } else if err.is_decode() {
            Self::Parse(format!("{service} response was not valid JSON: {err}"))
        } else {
            Self::Http(format!("{service} request failed: {err}"))
        }
    }
}

/// Convenience type alias for zone-sources results.
pub type Result<T> = std::result::Result<T, SourceError>;
