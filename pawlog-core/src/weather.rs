//! Façade over the OpenWeather-style REST API.
//!
//! Two URL variants are built against one base URL: `/weather` for current
//! conditions and `/onecall` for the multi-day forecast. Responses are decoded
//! into narrow wire shapes and mapped to the value types in [`crate::model`].

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::model::{CurrentWeather, DailyForecast};

/// Public OpenWeather API root.
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Client for the two weather endpoints the app uses.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    /// Client against the public OpenWeather API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Client against an explicit base URL. Used by tests and by deployments
    /// fronting the API with a proxy.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions for a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentWeather> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::api("weather current", status, &body));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| Error::decode("current weather JSON", e))?;

        map_current(&parsed)
    }

    /// Fetch the daily forecast for a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<DailyForecast>> {
        let url = format!("{}/onecall", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("units", "metric"),
                ("exclude", "hourly,minutely,current"),
                ("appid", self.api_key.as_str()),
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::api("weather forecast", status, &body));
        }

        let parsed: OwOneCallResponse =
            serde_json::from_str(&body).map_err(|e| Error::decode("forecast JSON", e))?;

        let forecast = map_forecast(&parsed)?;
        debug!(days = forecast.len(), "fetched forecast");
        Ok(forecast)
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    weather: Vec<OwCondition>,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    timezone_offset: i32,
    daily: Vec<OwDailyEntry>,
}

fn map_current(parsed: &OwCurrentResponse) -> Result<CurrentWeather> {
    let condition = parsed.weather.first().ok_or(Error::NoConditions)?;

    Ok(CurrentWeather {
        condition_id: condition.id,
        temperature_c: parsed.main.temp,
    })
}

fn map_forecast(parsed: &OwOneCallResponse) -> Result<Vec<DailyForecast>> {
    let mut days = Vec::with_capacity(parsed.daily.len());

    for entry in &parsed.daily {
        let condition = entry.weather.first().ok_or(Error::NoConditions)?;
        let weekday = localized_weekday(entry.dt, parsed.timezone_offset)?;

        days.push(DailyForecast {
            condition_id: condition.id,
            temp_min_c: entry.temp.min,
            temp_max_c: entry.temp.max,
            weekday,
        });
    }

    Ok(days)
}

/// Weekday name of a Unix timestamp, shifted into the UTC offset the
/// forecast response reports for its location.
fn localized_weekday(ts: i64, offset_secs: i32) -> Result<String> {
    let offset = FixedOffset::east_opt(offset_secs).ok_or(Error::BadTimestamp)?;
    let utc: DateTime<Utc> = DateTime::from_timestamp(ts, 0).ok_or(Error::BadTimestamp)?;

    Ok(utc.with_timezone(&offset).format("%A").to_string())
}
