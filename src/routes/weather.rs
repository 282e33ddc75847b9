//! Weather HTTP endpoints.
//!
//! - GET /fetch/?city=NAME
//! - GET /fetchreport/?city=NAME

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::services::report::ComparisonReport;
use crate::services::weather::WeatherError;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CityQuery {
    /// City name as understood by the weather API (e.g. "Paris")
    pub city: Option<String>,
}

impl CityQuery {
    fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Current weather for one city, passed through from the weather API.
#[utoipa::path(
    get,
    path = "/fetch/",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Raw weatherapi.com current.json body", body = serde_json::Value),
        (status = 400, description = "Missing city, or city unknown to the weather API", body = ErrorResponse),
        (status = 502, description = "Weather API unreachable or returned an unexpected body", body = ErrorResponse),
    )
)]
pub async fn fetch_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = query
        .city()
        .ok_or_else(|| AppError::BadRequest("City parameter is required".to_string()))?;

    match state.weather.fetch_raw(city).await {
        Ok(body) => Ok(Json(body)),
        Err(WeatherError::Upstream(msg)) => {
            tracing::debug!("Weather API rejected '{}': {}", city, msg);
            Err(AppError::BadRequest("City not found or invalid".to_string()))
        }
        Err(e) => Err(AppError::ExternalServiceError(e.to_string())),
    }
}

/// AI comparison report for a stored city against every other stored city.
#[utoipa::path(
    get,
    path = "/fetchreport/",
    tag = "Weather",
    params(CityQuery),
    responses(
        (status = 200, description = "Comparison report", body = ComparisonReport),
        (status = 400, description = "Missing city parameter", body = ErrorResponse),
        (status = 404, description = "City is not in the stored list", body = ErrorResponse),
        (status = 500, description = "Weather for the selected city could not be fetched", body = ErrorResponse),
    )
)]
pub async fn fetch_report(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<ComparisonReport>, AppError> {
    let city = query.city.unwrap_or_default();
    let report = state.generator.generate(&city).await?;
    Ok(Json(report))
}
