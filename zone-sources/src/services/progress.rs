//! Progress sync sink keyed by identity.

use crate::config::SourcesConfig;
use crate::error::{Result, SourceError};
use crate::http;
use crate::types::Identity;

const SERVICE: &str = "progress";

/// Client for the progress sync sink.
#[derive(Clone)]
pub struct ProgressClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProgressClient {
    /// Create a client using `config.progress_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.progress_url)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(config: &SourcesConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.to_owned(),
        })
    }

    /// Store `blob` as the latest progress for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the URL cannot be built, otherwise a
    /// transport or status error.
    pub async fn push(&self, identity: &Identity, blob: &serde_json::Value) -> Result<()> {
        let mut url = url::Url::parse(&http::endpoint(&self.base_url, "progress"))
            .map_err(|e| SourceError::Config(format!("progress URL is invalid: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SourceError::Config("progress URL cannot take a path".into()))?
            .push(&identity.id);

        let mut request = self.client.put(url).json(blob);
        if let Some(token) = &identity.token {
            request = request.bearer_auth(token);
        }
        http::send_empty(SERVICE, request).await
    }
}
