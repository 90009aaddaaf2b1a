//! Streamer/creator live status.

use crate::config::SourcesConfig;
use crate::error::Result;
use crate::http;
use crate::types::CreatorStatus;

const SERVICE: &str = "creators";

/// Client for the creator live-status endpoint.
#[derive(Clone)]
pub struct CreatorsClient {
    client: reqwest::Client,
    base_url: String,
}

impl CreatorsClient {
    /// Create a client using `config.creators_url`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.creators_url)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(config: &SourcesConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.to_owned(),
        })
    }

    /// Current status of every tracked creator.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error when the call fails.
    pub async fn statuses(&self) -> Result<Vec<CreatorStatus>> {
        let request = self.client.get(http::endpoint(&self.base_url, "status"));
        http::send_json(SERVICE, request).await
    }
}
