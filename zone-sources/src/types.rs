//! Core types returned by the data sources.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Display name of the resolved place.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Country, when the geocoder reports one.
    #[serde(default)]
    pub country: Option<String>,
}

/// Current conditions plus a multi-day outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub condition: WeatherCondition,
    pub wind_kph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_c: f64,
    pub low_c: f64,
    pub condition: WeatherCondition,
}

/// Numeric weather condition code (WMO 4677 subset used by the forecast API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCondition(pub u8);

impl WeatherCondition {
    /// Human-readable description of the condition code.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "clear sky",
            1 => "mainly clear",
            2 => "partly cloudy",
            3 => "overcast",
            45 | 48 => "fog",
            51 | 53 | 55 => "drizzle",
            56 | 57 => "freezing drizzle",
            61 | 63 | 65 => "rain",
            66 | 67 => "freezing rain",
            71 | 73 | 75 | 77 => "snow",
            80..=82 => "rain showers",
            85 | 86 => "snow showers",
            95 => "thunderstorm",
            96 | 99 => "thunderstorm with hail",
            _ => "unknown conditions",
        }
    }

    /// Short pictogram for transcript rendering.
    pub fn icon(self) -> &'static str {
        match self.0 {
            0 | 1 => "☀️",
            2 => "⛅",
            3 | 45 | 48 => "☁️",
            51..=67 | 80..=82 => "🌧️",
            71..=77 | 85 | 86 => "❄️",
            95..=99 => "⛈️",
            _ => "🌡️",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An entry from the events catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub title: String,
    /// Either a plain date (`2026-10-16`) or an RFC 3339 timestamp.
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogEvent {
    /// Calendar date of the event, if the catalog date is parseable.
    pub fn day(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
    }

    /// Whether the event belongs to `category`, by category field or tag.
    pub fn matches_category(&self, category: &str) -> bool {
        let wanted = category.to_lowercase();
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == wanted)
            || self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

/// An entry from the media catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// Live status of a streamer/creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorStatus {
    pub name: String,
    #[serde(default)]
    pub platform: String,
    pub live: bool,
    /// Current stream title while live.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub viewers: Option<u64>,
}

/// The identity handed back by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    /// Bearer token for the progress sink. Never logged.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Identity {
    /// An identity without a token, for local/offline sessions.
    pub fn local(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_codes_map_to_descriptions() {
        assert_eq!(WeatherCondition(0).description(), "clear sky");
        assert_eq!(WeatherCondition(63).description(), "rain");
        assert_eq!(WeatherCondition(95).description(), "thunderstorm");
        assert_eq!(WeatherCondition(42).description(), "unknown conditions");
    }

    #[test]
    fn event_day_accepts_plain_and_rfc3339_dates() {
        let mut event = CatalogEvent {
            title: "Synth night".into(),
            date: "2026-10-16".into(),
            location: "Toronto".into(),
            description: String::new(),
            category: Some("Music".into()),
            tags: vec![],
        };
        assert_eq!(event.day(), NaiveDate::from_ymd_opt(2026, 10, 16));

        event.date = "2026-10-17T19:30:00-04:00".into();
        assert_eq!(event.day(), NaiveDate::from_ymd_opt(2026, 10, 17));

        event.date = "sometime soon".into();
        assert!(event.day().is_none());
    }

    #[test]
    fn event_category_matches_field_or_tag() {
        let event = CatalogEvent {
            title: "Hack night".into(),
            date: "2026-10-16".into(),
            location: String::new(),
            description: String::new(),
            category: None,
            tags: vec!["Tech".into(), "community".into()],
        };
        assert!(event.matches_category("tech"));
        assert!(!event.matches_category("music"));
    }

    #[test]
    fn identity_token_is_not_serialized() {
        let identity = Identity {
            id: "u1".into(),
            display_name: "Sam".into(),
            token: Some("secret".into()),
        };
        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("secret"));
    }
}
