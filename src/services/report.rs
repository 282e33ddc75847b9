//! Comparison report generation.
//!
//! Fetches current weather for every stored city in turn, renders a digest,
//! asks Gemini for a narrative comparison and appends a record for the
//! selected city. Steps after the fan-out degrade instead of failing:
//!
//! - a city whose fetch fails is skipped (unless it is the selected city)
//! - a failed generation becomes [`FALLBACK_REPORT`](crate::services::llm::FALLBACK_REPORT)
//! - a failed record write is logged and dropped

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::db::store::{CityStore, NewWeatherRecord, ReportStore};
use crate::services::llm::GeminiClient;
use crate::services::weather::{WeatherClient, WeatherSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("city parameter is required")]
    MissingParameter,

    #[error("city '{0}' is not in the city list")]
    UnknownCity(String),

    #[error("weather for '{0}' is unavailable")]
    UpstreamUnavailable(String),

    #[error("city store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Per-city snapshots in fan-out order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherByCity(Vec<(String, WeatherSnapshot)>);

impl WeatherByCity {
    pub fn get(&self, city: &str) -> Option<&WeatherSnapshot> {
        self.0.iter().find(|(name, _)| name == city).map(|(_, w)| w)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WeatherSnapshot)> {
        self.0.iter().map(|(name, w)| (name.as_str(), w))
    }

    fn push(&mut self, city: String, snapshot: WeatherSnapshot) {
        self.0.push((city, snapshot));
    }
}

impl Serialize for WeatherByCity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (city, snapshot) in &self.0 {
            map.serialize_entry(city, snapshot)?;
        }
        map.end()
    }
}

/// Response body of `GET /fetchreport/`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComparisonReport {
    /// The city the report is written about
    pub selected_city: String,
    /// Current weather keyed by city name; cities whose fetch failed are absent
    #[serde(rename = "weather_data")]
    #[schema(value_type = Object)]
    pub weather_by_city: WeatherByCity,
    /// Model-written comparison, or a fixed fallback sentence
    pub ai_report: String,
}

/// Orchestrates the fan-out, generation and record write for one report.
#[derive(Clone)]
pub struct ReportGenerator {
    cities: Arc<dyn CityStore>,
    reports: Arc<dyn ReportStore>,
    weather: WeatherClient,
    llm: GeminiClient,
}

impl ReportGenerator {
    pub fn new(
        cities: Arc<dyn CityStore>,
        reports: Arc<dyn ReportStore>,
        weather: WeatherClient,
        llm: GeminiClient,
    ) -> Self {
        Self {
            cities,
            reports,
            weather,
            llm,
        }
    }

    pub async fn generate(&self, selected_city: &str) -> Result<ComparisonReport, ReportError> {
        if selected_city.is_empty() {
            return Err(ReportError::MissingParameter);
        }

        let names = known_city_names(self.cities.list().await?);
        if !names.iter().any(|n| n == selected_city) {
            return Err(ReportError::UnknownCity(selected_city.to_string()));
        }

        let weather_by_city = self.fetch_all(&names).await;

        let selected = weather_by_city
            .get(selected_city)
            .cloned()
            .ok_or_else(|| ReportError::UpstreamUnavailable(selected_city.to_string()))?;

        let prompt = build_prompt(&render_digest(&weather_by_city), selected_city);
        let ai_report = self.llm.generate(&prompt).await;

        let record = NewWeatherRecord {
            city: selected_city.to_string(),
            temperature_c: selected.temperature_celsius,
            condition: selected.condition,
        };
        if let Err(e) = self.reports.append(record).await {
            tracing::warn!("Failed to store report record for '{}': {}", selected_city, e);
        }

        Ok(ComparisonReport {
            selected_city: selected_city.to_string(),
            weather_by_city,
            ai_report,
        })
    }

    /// Sequential fan-out. Failures are logged and the city is left out.
    async fn fetch_all(&self, names: &[String]) -> WeatherByCity {
        let mut results = WeatherByCity::default();
        for name in names {
            match self.weather.fetch(name).await {
                Ok(snapshot) => results.push(name.clone(), snapshot),
                Err(e) => tracing::warn!("Skipping '{}' in report: {}", name, e),
            }
        }
        if results.is_empty() {
            tracing::warn!("Weather fetch failed for all {} cities", names.len());
        } else {
            tracing::debug!(
                "Fetched weather for {}/{} cities",
                results.len(),
                names.len()
            );
        }
        results
    }
}

/// Stored names in list order, without blanks and without repeats.
fn known_city_names(cities: Vec<crate::db::models::City>) -> Vec<String> {
    let mut seen = HashSet::new();
    cities
        .into_iter()
        .map(|c| c.name)
        .filter(|name| !name.trim().is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Render a float the way the digest shows readings: always at least one decimal.
fn format_reading(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// One line per city, in `weather` order.
pub fn render_digest(weather: &WeatherByCity) -> String {
    weather
        .iter()
        .map(|(city, w)| {
            format!(
                "- {}: {}°C, {}, Humidity {}%, Wind {} kph, Pressure {} hPa, UV {}",
                city,
                format_reading(w.temperature_celsius),
                w.condition,
                w.humidity_percent,
                format_reading(w.wind_kph),
                format_reading(w.pressure_mb),
                format_reading(w.uv_index),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(digest: &str, selected_city: &str) -> String {
    format!(
        "You are a professional meteorologist and climate analyst.

Here is real-time weather data for several cities:

{digest}

Please generate an in-depth, engaging, and human-readable weather comparison report.

Focus on:
- A detailed analysis of how {selected_city}'s weather compares to the others.
- Temperature, humidity, and air pressure differences.
- Comfort level (dry/humid, windy/calm, hot/cool).
- Which city has the most pleasant or extreme weather.
- Any interesting insights (e.g., coastal vs inland effects, time of year context, etc.)
- Keep the tone informative but accessible (as if a news weather presenter is explaining it).

End with a one-line \"Summary Verdict\" comparing {selected_city} to others.
"
    )
}
