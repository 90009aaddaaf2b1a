//! # zone-sources
//!
//! HTTP clients for the external data sources the zone assistant consults.
//!
//! ## Design
//!
//! - One small client per source (geocoding, weather, events, media,
//!   creators, progress sync, login), all JSON over plain HTTP
//! - Every failure is a typed [`SourceError`]; callers decide how to degrade
//! - No retries: a failed call fails once and the caller renders an
//!   "unavailable" fragment
//! - Geocoding answers are cached in memory with a configurable TTL
//!
//! ## Security
//!
//! - Bearer tokens are attached only to the progress sink and never logged
//! - Request details are logged at trace level only

pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod types;

pub use config::SourcesConfig;
pub use error::{Result, SourceError};
pub use services::{
    AuthClient, CreatorsClient, EventsClient, GeocodingClient, MediaClient, ProgressClient,
    WeatherClient,
};
pub use types::{
    CatalogEvent, Coordinates, CreatorStatus, CurrentConditions, DailyForecast, Forecast,
    Identity, MediaItem, WeatherCondition,
};

/// Every source client, built from one [`SourcesConfig`].
#[derive(Clone)]
pub struct SourceClients {
    pub geocoding: GeocodingClient,
    pub weather: WeatherClient,
    pub events: EventsClient,
    pub media: MediaClient,
    pub creators: CreatorsClient,
    pub progress: ProgressClient,
    pub auth: AuthClient,
}

impl SourceClients {
    /// Validate `config` and build all clients from it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] for an invalid configuration or
    /// [`SourceError::Http`] if an HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            geocoding: GeocodingClient::new(config)?,
            weather: WeatherClient::new(config)?,
            events: EventsClient::new(config)?,
            media: MediaClient::new(config)?,
            creators: CreatorsClient::new(config)?,
            progress: ProgressClient::new(config)?,
            auth: AuthClient::new(config)?,
        })
    }
}
