pub mod cities;
pub mod health;
pub mod reports;
pub mod weather;

use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

use crate::db::store::{CityStore, ReportStore};
use crate::services::report::ReportGenerator;
use crate::services::weather::WeatherClient;

/// Shared application state for the weather and city endpoints.
///
/// Every client is built once in `main` and injected here.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) cities: Arc<dyn CityStore>,
    pub(crate) reports: Arc<dyn ReportStore>,
    pub(crate) weather: WeatherClient,
    pub(crate) generator: ReportGenerator,
}

/// Routes backed by `AppState`. Health is mounted separately on the pool.
pub(crate) fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/fetch/", get(weather::fetch_weather))
        .route("/fetchreport/", get(weather::fetch_report))
        .route("/addcity/", post(cities::add_city))
        .route("/getcities/", get(cities::get_cities))
        .route("/deletecity/:city_id/", delete(cities::delete_city))
        .route("/reports/", get(reports::list_reports))
        .with_state(state)
}
