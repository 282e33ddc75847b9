//! weatherapi.com current-conditions client.
//!
//! See: https://www.weatherapi.com/docs/

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

/// Failure to obtain a city's current weather.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream body carried an `error` object (unknown city, bad key, ...).
    #[error("weather API rejected the query: {0}")]
    Upstream(String),

    #[error("weather API returned HTTP {0}")]
    Status(u16),

    #[error("weather API response structure error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Current conditions for one city, as used in reports.
///
/// JSON keys follow weatherapi.com's `current` object so the frontend can
/// read either payload the same way.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherSnapshot {
    /// Air temperature in Celsius
    #[serde(rename = "temp_c")]
    pub temperature_celsius: f64,
    /// Condition text (e.g. "Partly cloudy")
    pub condition: String,
    /// Relative humidity percentage
    #[serde(rename = "humidity")]
    pub humidity_percent: i32,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Air pressure in millibars (hPa)
    pub pressure_mb: f64,
    /// UV index
    #[serde(rename = "uv")]
    pub uv_index: f64,
}

// --- weatherapi.com JSON response types ---

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
    humidity: i32,
    wind_kph: f64,
    pressure_mb: f64,
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

impl From<Current> for WeatherSnapshot {
    fn from(c: Current) -> Self {
        Self {
            temperature_celsius: c.temp_c,
            condition: c.condition.text,
            humidity_percent: c.humidity,
            wind_kph: c.wind_kph,
            pressure_mb: c.pressure_mb,
            uv_index: c.uv,
        }
    }
}

/// Client for the weatherapi.com `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch current conditions and return the upstream body untouched.
    ///
    /// A body with an `error` field is an error even when the HTTP status is 200.
    pub async fn fetch_raw(&self, city: &str) -> Result<serde_json::Value, WeatherError> {
        let url = format!("{}/current.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(WeatherError::Upstream(message));
        }

        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        Ok(body)
    }

    /// Fetch current conditions for `city`. Every snapshot field must be present.
    pub async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let body = self.fetch_raw(city).await?;
        parse_current(body)
    }
}

/// Parse a `current.json` body into a snapshot. Pure, no I/O.
pub fn parse_current(body: serde_json::Value) -> Result<WeatherSnapshot, WeatherError> {
    let parsed: CurrentResponse = serde_json::from_value(body)?;
    Ok(parsed.current.into())
}

#[cfg(test)]
pub(crate) mod testing {
    /// A `current.json` body as weatherapi.com returns it (trimmed).
    pub(crate) fn current_body(
        city: &str,
        temp_c: f64,
        condition: &str,
        humidity: i32,
        wind_kph: f64,
        pressure_mb: f64,
        uv: f64,
    ) -> serde_json::Value {
        serde_json::json!({
            "location": { "name": city, "country": "Somewhere" },
            "current": {
                "temp_c": temp_c,
                "condition": { "text": condition, "code": 1000 },
                "humidity": humidity,
                "wind_kph": wind_kph,
                "pressure_mb": pressure_mb,
                "uv": uv,
                "feelslike_c": temp_c
            }
        })
    }

    pub(crate) fn not_found_body() -> serde_json::Value {
        serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })
    }
}
