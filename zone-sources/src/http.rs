//! Shared HTTP plumbing for the source clients.
//!
//! Provides a configured [`reqwest::Client`] and small helpers that turn
//! non-success statuses and malformed bodies into [`SourceError`] values.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::SourcesConfig;
use crate::error::SourceError;

/// Build a [`reqwest::Client`] configured for the data sources.
///
/// The client has:
/// - Timeout from config
/// - The configured User-Agent
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SourcesConfig) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SourceError::Http(format!("failed to build HTTP client: {e}")))
}

/// Join a base URL and a relative path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a prepared request and decode a JSON body.
///
/// Non-2xx statuses map to [`SourceError::Status`]; undecodable bodies map to
/// [`SourceError::Parse`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(service, &e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(service, status = status.as_u16(), "source returned error status");
        return Err(SourceError::Status {
            service,
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SourceError::from_reqwest(service, &e))?;

    tracing::trace!(service, bytes = bytes.len(), "source response received");

    serde_json::from_slice(&bytes)
        .map_err(|e| SourceError::Parse(format!("{service} response did not match: {e}")))
}

/// Send a prepared request whose body we do not care about.
pub(crate) async fn send_empty(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<(), SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(service, &e))?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(SourceError::Status {
            service,
            status: status.as_u16(),
        })
    }
}
