use std::time::Duration;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub weather_api_url: String,
    pub weather_api_key: String,
    pub gemini_api_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Per-request timeout for outbound calls (weather API and Gemini).
    pub http_timeout: Duration,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            weather_api_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "http://api.weatherapi.com/v1".to_string()),
            weather_api_key: std::env::var("WEATHER_API_KEY")
                .expect("WEATHER_API_KEY must be set"),
            gemini_api_url: std::env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            gemini_api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            http_timeout: Duration::from_secs(
                std::env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("HTTP_TIMEOUT_SECS must be a whole number of seconds"),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
        }
    }
}
