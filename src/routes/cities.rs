use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;
use crate::db::models;
use crate::errors::{AppError, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCityRequest {
    /// City name to track
    pub city: Option<String>,
}

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityResponse {
    /// Surrogate id, used by DELETE /deletecity/{city_id}/
    pub id: i64,
    pub name: String,
    /// When the city was added (RFC 3339)
    pub created_at: String,
}

impl From<models::City> for CityResponse {
    fn from(c: models::City) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CitiesResponse {
    pub cities: Vec<CityResponse>,
}

/// Add a city to the list. Duplicate names are accepted.
#[utoipa::path(
    post,
    path = "/addcity/",
    tag = "Cities",
    request_body = AddCityRequest,
    responses(
        (status = 200, description = "City stored", body = MessageResponse),
        (status = 400, description = "Missing city", body = ErrorResponse),
    )
)]
pub async fn add_city(
    State(state): State<AppState>,
    Json(body): Json<AddCityRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let name = body
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("City is required".to_string()))?;

    let city = state.cities.insert(&name).await?;
    tracing::info!("Added city '{}' (id={})", city.name, city.id);

    Ok(Json(MessageResponse {
        message: format!("City {} added successfully.", city.name),
    }))
}

/// List all stored cities.
#[utoipa::path(
    get,
    path = "/getcities/",
    tag = "Cities",
    responses(
        (status = 200, description = "All stored cities", body = CitiesResponse),
    )
)]
pub async fn get_cities(State(state): State<AppState>) -> Result<Json<CitiesResponse>, AppError> {
    let cities = state.cities.list().await?;
    Ok(Json(CitiesResponse {
        cities: cities.into_iter().map(CityResponse::from).collect(),
    }))
}

/// Delete a city by id. Succeeds whether or not the id exists.
#[utoipa::path(
    delete,
    path = "/deletecity/{city_id}/",
    tag = "Cities",
    params(
        ("city_id" = i64, Path, description = "City id"),
    ),
    responses(
        (status = 200, description = "City deleted (or never existed)", body = MessageResponse),
    )
)]
pub async fn delete_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.cities.delete(city_id).await? {
        tracing::debug!("Delete of city id={} matched no row", city_id);
    }

    Ok(Json(MessageResponse {
        message: format!("City with id {} deleted successfully.", city_id),
    }))
}
