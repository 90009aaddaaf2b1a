//! Media catalog search (films and series).

use serde::Deserialize;

use crate::config::SourcesConfig;
use crate::error::Result;
use crate::http;
use crate::types::MediaItem;

const SERVICE: &str = "media";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MediaItem>,
}

/// Client for the media catalog search endpoint.
#[derive(Clone)]
pub struct MediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl MediaClient {
    /// Create a client using `config.media_url`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.media_url)
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

    /// Search the catalog. An empty query asks the service for its trending list.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error when the call fails.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<MediaItem>> {
        let limit = limit.max(1).to_string();
        let request = self
            .client
            .get(http::endpoint(&self.base_url, "search"))
            .query(&[("query", query.trim()), ("limit", limit.as_str())]);
        let response: SearchResponse = http::send_json(SERVICE, request).await?;
        Ok(response.results)
    }
}
