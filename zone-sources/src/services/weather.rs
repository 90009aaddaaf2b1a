//! Weather forecast: coordinates to current conditions plus a daily outlook.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::SourcesConfig;
use crate::error::{Result, SourceError};
use crate::http;
use crate::types::{Coordinates, CurrentConditions, DailyForecast, Forecast, WeatherCondition};

const SERVICE: &str = "weather";

#[derive(Deserialize)]
struct ForecastResponse {
    current: CurrentWire,
    daily: DailyWire,
}

#[derive(Deserialize)]
struct CurrentWire {
    temperature_2m: f64,
    weather_code: u8,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
}

/// Column-oriented daily block, one vector per field.
#[derive(Deserialize)]
struct DailyWire {
    time: Vec<String>,
    weather_code: Vec<u8>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

impl DailyWire {
    fn into_rows(self) -> Result<Vec<DailyForecast>> {
        let len = self.time.len();
        if self.weather_code.len() != len
            || self.temperature_2m_max.len() != len
            || self.temperature_2m_min.len() != len
        {
            return Err(SourceError::Parse(
                "weather daily columns have mismatched lengths".into(),
            ));
        }

        self.time
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map_err(|e| SourceError::Parse(format!("bad forecast date {day}: {e}")))?;
                Ok(DailyForecast {
                    date,
                    high_c: self.temperature_2m_max[i],
                    low_c: self.temperature_2m_min[i],
                    condition: WeatherCondition(self.weather_code[i]),
                })
            })
            .collect()
    }
}

/// Client for the weather forecast service.
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a client using `config.weather_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Self::with_base_url(config, &config.weather_url)
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

    /// Fetch current conditions and a `days`-day forecast for `at`.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or parse error when the call fails.
    pub async fn forecast(&self, at: &Coordinates, days: u8) -> Result<Forecast> {
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();
        let days = days.clamp(1, 16).to_string();

        let request = self
            .client
            .get(http::endpoint(&self.base_url, "forecast"))
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", "temperature_2m,weather_code,wind_speed_10m"),
                ("daily", "weather_code,temperature_2m_max,temperature_2m_min"),
                ("forecast_days", days.as_str()),
                ("timezone", "auto"),
            ]);
        let response: ForecastResponse = http::send_json(SERVICE, request).await?;

        Ok(Forecast {
            current: CurrentConditions {
                temperature_c: response.current.temperature_2m,
                condition: WeatherCondition(response.current.weather_code),
                wind_kph: response.current.wind_speed_10m,
            },
            daily: response.daily.into_rows()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_columns_become_rows() {
        let wire = DailyWire {
            time: vec!["2026-10-16".into(), "2026-10-17".into()],
            weather_code: vec![0, 61],
            temperature_2m_max: vec![14.0, 11.5],
            temperature_2m_min: vec![6.0, 4.5],
        };
        let rows = wire.into_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].condition.description(), "rain");
        assert!((rows[1].low_c - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mismatched_columns_are_a_parse_error() {
        let wire = DailyWire {
            time: vec!["2026-10-16".into()],
            weather_code: vec![0, 1],
            temperature_2m_max: vec![14.0],
            temperature_2m_min: vec![6.0],
        };
        assert!(matches!(wire.into_rows(), Err(SourceError::Parse(_))));
    }
}
