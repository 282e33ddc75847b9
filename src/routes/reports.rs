//! Report history endpoint.
//!
//! GET /reports/?city=NAME&limit=N — records appended by `/fetchreport/`.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::AppState;
use crate::db::models;
use crate::errors::AppError;
use crate::helpers::dec_to_f64;

/// Default number of records returned.
const DEFAULT_HISTORY_LIMIT: i64 = 20;
/// Upper bound on `limit`.
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportHistoryQuery {
    /// Only return records for this city
    pub city: Option<String>,
    /// Maximum number of records (default 20, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportRecordResponse {
    pub id: i64,
    pub city: String,
    /// Temperature in Celsius at report time
    pub temperature: f64,
    pub condition: String,
    /// When the report was generated (RFC 3339)
    pub created_at: String,
}

impl From<models::WeatherRecord> for ReportRecordResponse {
    fn from(r: models::WeatherRecord) -> Self {
        Self {
            id: r.id,
            city: r.city,
            temperature: dec_to_f64(r.temperature),
            condition: r.condition,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportHistoryResponse {
    pub reports: Vec<ReportRecordResponse>,
}

/// Recent report records, newest first.
#[utoipa::path(
    get,
    path = "/reports/",
    tag = "Reports",
    params(ReportHistoryQuery),
    responses(
        (status = 200, description = "Report records, newest first", body = ReportHistoryResponse),
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportHistoryQuery>,
) -> Result<Json<ReportHistoryResponse>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let city = query.city.as_deref().filter(|c| !c.trim().is_empty());

    let records = state.reports.recent(city, limit).await?;
    Ok(Json(ReportHistoryResponse {
        reports: records.into_iter().map(ReportRecordResponse::from).collect(),
    }))
}
