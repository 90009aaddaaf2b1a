//! Events catalog: a flat list of upcoming events.

use crate::config::SourcesConfig;
use crate::error::Result;
use crate::http;
use crate::types::CatalogEvent;

const SERVICE: &str = "events";

/// Client for the events catalog.
#[derive(Clone)]
pub struct EventsClient {
    client: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    /// Create a client using `config.events_url`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.events_url)
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

    /// Fetch the whole catalog. Filtering happens on the caller side since the
    /// catalog endpoint takes no query parameters.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error when the call fails.
    pub async fn list(&self) -> Result<Vec<CatalogEvent>> {
        let request = self.client.get(http::endpoint(&self.base_url, "events"));
        let events: Vec<CatalogEvent> = http::send_json(SERVICE, request).await?;
        tracing::debug!(count = events.len(), "events catalog fetched");
        Ok(events)
    }
}
