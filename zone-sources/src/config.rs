//! Source configuration with sensible defaults.
//!
//! [`SourcesConfig`] holds the base URL of every data source plus shared
//! request behaviour. Each client also accepts an explicit base URL so tests
//! can point it at a mock server.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Configuration shared by all source clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Geocoding service (place name or postal code to coordinates).
    pub geocoding_url: String,
    /// Weather forecast service.
    pub weather_url: String,
    /// Events catalog service.
    pub events_url: String,
    /// Media catalog search service.
    pub media_url: String,
    /// Creator live-status service.
    pub creators_url: String,
    /// Progress sync sink, keyed by identity.
    pub progress_url: String,
    /// Login endpoint.
    pub auth_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// How long geocoding answers are cached, in seconds. 0 disables caching.
    pub geocode_cache_ttl_seconds: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1".to_owned(),
            weather_url: "https://api.open-meteo.com/v1".to_owned(),
            events_url: "http://localhost:8787/api".to_owned(),
            media_url: "http://localhost:8787/api/media".to_owned(),
            creators_url: "http://localhost:8787/api/creators".to_owned(),
            progress_url: "http://localhost:8787/api".to_owned(),
            auth_url: "http://localhost:8787/api".to_owned(),
            timeout_seconds: 8,
            geocode_cache_ttl_seconds: 3600,
            user_agent: concat!("zone-sources/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl SourcesConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - every base URL must parse as an absolute `http`/`https` URL
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.timeout_seconds == 0 {
            return Err(SourceError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        let urls = [
            ("geocoding_url", &self.geocoding_url),
            ("weather_url", &self.weather_url),
            ("events_url", &self.events_url),
            ("media_url", &self.media_url),
            ("creators_url", &self.creators_url),
            ("progress_url", &self.progress_url),
            ("auth_url", &self.auth_url),
        ];
        for (field, raw) in urls {
            let parsed = url::Url::parse(raw)
                .map_err(|e| SourceError::Config(format!("{field} is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SourceError::Config(format!(
                    "{field} must use http or https"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SourcesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_seconds, 8);
        assert!(config.user_agent.starts_with("zone-sources/"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SourcesConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn relative_url_rejected() {
        let config = SourcesConfig {
            events_url: "/api/events".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("events_url"));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let config = SourcesConfig {
            weather_url: "ftp://weather.example".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SourcesConfig =
            serde_json::from_str(r#"{"timeout_seconds": 3}"#).unwrap();
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.weather_url, SourcesConfig::default().weather_url);
    }
}
