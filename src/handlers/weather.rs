//! Weather: geocode the spoken place, then fetch the forecast.

use async_trait::async_trait;
use tracing::debug;
use zone_sources::{Coordinates, Forecast, GeocodingClient, WeatherClient};

use super::{Handler, HandlerContext, short_date, tag};
use crate::error::Result;
use crate::intent::{Domain, Slots, TimeRange};
use crate::render::Fragment;

pub struct WeatherHandler {
    geocoding: GeocodingClient,
    weather: WeatherClient,
    default_location: String,
    days: u8,
}

impl WeatherHandler {
    pub fn new(
        geocoding: GeocodingClient,
        weather: WeatherClient,
        default_location: String,
        days: u8,
    ) -> Self {
        Self {
            geocoding,
            weather,
            default_location,
            days,
        }
    }
}

#[async_trait]
impl Handler for WeatherHandler {
    fn domain(&self) -> Domain {
        Domain::Weather
    }

    async fn handle(&self, slots: &Slots, ctx: &HandlerContext) -> Result<Fragment> {
        let place = slots
            .location
            .as_deref()
            .unwrap_or(self.default_location.as_str());
        let at = match self.geocoding.lookup(place).await {
            Ok(at) => at,
            Err(zone_sources::SourceError::NotFound(_)) => {
                return Ok(Fragment::ok(
                    tag(Domain::Weather),
                    format!("I couldn't find a place called **{place}**. Try a nearby city."),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        // Fetch enough days to cover the requested window.
        let days = match slots.time_range {
            Some(TimeRange::NextWeek) => 14,
            Some(TimeRange::ThisWeek | TimeRange::ThisWeekend) => 7,
            Some(TimeRange::ThisMonth) => 16,
            _ => self.days.max(2),
        };
        let forecast = self.weather.forecast(&at, days).await?;
        debug!(place = %at.name, days = forecast.daily.len(), "forecast fetched");
        Ok(Fragment::ok(
            tag(Domain::Weather),
            render(&at, &forecast, slots.time_range, ctx, usize::from(self.days)),
        ))
    }
}

fn render(
    at: &Coordinates,
    forecast: &Forecast,
    range: Option<TimeRange>,
    ctx: &HandlerContext,
    default_days: usize,
) -> String {
    let place = match &at.country {
        Some(country) => format!("{}, {country}", at.name),
        None => at.name.clone(),
    };
    let now = &forecast.current;
    let mut body = format!(
        "**Weather for {place}**\n\n{} {}, {:.0}°C",
        now.condition.icon(),
        now.condition.description(),
        now.temperature_c
    );
    if let Some(wind) = now.wind_kph {
        body.push_str(&format!(", wind {wind:.0} km/h"));
    }

    let in_range: Vec<_> = match range {
        Some(range) => forecast
            .daily
            .iter()
            .filter(|d| range.contains(ctx.today, d.date))
            .collect(),
        None => forecast.daily.iter().take(default_days).collect(),
    };
    let days = if in_range.is_empty() {
        forecast.daily.iter().take(default_days).collect()
    } else {
        in_range
    };
    if !days.is_empty() {
        body.push('\n');
    }
    for day in days {
        body.push_str(&format!(
            "\n- {}: {} {}, {:.0}° / {:.0}°",
            short_date(day.date),
            day.condition.icon(),
            day.condition.description(),
            day.low_c,
            day.high_c
        ));
    }
    body
}
