// Weather Report API v0.1
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use db::store::PgStore;
use routes::AppState;
use services::llm::GeminiClient;
use services::report::ReportGenerator;
use services::weather::WeatherClient;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;
/// Minimum number of connections kept alive in the database pool.
const DB_POOL_MIN_CONNECTIONS: u32 = 1;

/// Weather Report API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Report API",
        version = "0.1.0",
        description = "Tracks a list of cities, proxies current conditions from \
            weatherapi.com and asks Gemini to write a comparison of the selected \
            city against the rest. Each generated report is recorded.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Current weather and comparison reports"),
        (name = "Cities", description = "Tracked city list"),
        (name = "Reports", description = "Recorded report history"),
    ),
    paths(
        routes::health::health_check,
        routes::weather::fetch_weather,
        routes::weather::fetch_report,
        routes::cities::add_city,
        routes::cities::get_cities,
        routes::cities::delete_city,
        routes::reports::list_reports,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::cities::AddCityRequest,
            routes::cities::MessageResponse,
            routes::cities::CityResponse,
            routes::cities::CitiesResponse,
            routes::reports::ReportRecordResponse,
            routes::reports::ReportHistoryResponse,
            services::weather::WeatherSnapshot,
            services::report::ComparisonReport,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_report_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Set up database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .min_connections(DB_POOL_MIN_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Outbound clients
    let weather_client = WeatherClient::new(
        &config.weather_api_url,
        &config.weather_api_key,
        config.http_timeout,
    )
    .expect("Failed to build weather HTTP client");
    let gemini_client = GeminiClient::new(
        &config.gemini_api_url,
        &config.gemini_api_key,
        &config.gemini_model,
        config.http_timeout,
    )
    .expect("Failed to build Gemini HTTP client");

    // Build shared application state
    let store = Arc::new(PgStore::new(pool.clone()));
    let app_state = AppState {
        cities: store.clone(),
        reports: store.clone(),
        weather: weather_client.clone(),
        generator: ReportGenerator::new(store.clone(), store, weather_client, gemini_client),
    };

    // CORS — the browser frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    // Health check uses PgPool to verify DB connectivity
    let health_routes = Router::new()
        .route("/health/", get(routes::health::health_check))
        .with_state(pool);

    let app = Router::new()
        .merge(health_routes)
        .merge(routes::api_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
