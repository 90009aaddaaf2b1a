//! Geocoding: place name or postal code to coordinates.
//!
//! Answers are cached per normalised place string with [`moka`], since the
//! same city tends to be asked about repeatedly within a session.

use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;

use crate::config::SourcesConfig;
use crate::error::{Result, SourceError};
use crate::http;
use crate::types::Coordinates;

const SERVICE: &str = "geocoding";

/// Maximum number of cached place lookups.
const MAX_CACHE_ENTRIES: u64 = 256;

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Coordinates>,
}

/// Client for the geocoding service.
#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<String, Coordinates>>,
}

impl GeocodingClient {
    /// Create a client using `config.geocoding_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.geocoding_url)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(config: &SourcesConfig, base_url: &str) -> Result<Self> {
        let cache = (config.geocode_cache_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(config.geocode_cache_ttl_seconds))
                .build()
        });
        Ok(Self {
            client: http::build_client(config)?,
            base_url: base_url.to_owned(),
            cache,
        })
    }

    /// Resolve `place` to the best matching coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] when the geocoder has no match, or a
    /// transport/status/parse error when the call fails.
    pub async fn lookup(&self, place: &str) -> Result<Coordinates> {
        let key = place.trim().to_lowercase();
        if key.is_empty() {
            return Err(SourceError::NotFound("empty place name".into()));
        }

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::trace!(place = %key, "geocode cache hit");
                return Ok(hit);
            }
        }

        let request = self
            .client
            .get(http::endpoint(&self.base_url, "search"))
            .query(&[
                ("name", key.as_str()),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ]);
        let response: GeocodingResponse = http::send_json(SERVICE, request).await?;

        let best = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("no place named {key}")))?;

        if let Some(cache) = &self.cache {
            cache.insert(key, best.clone()).await;
        }
        Ok(best)
    }
}
