use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A city the operator has asked to track. Names are not unique.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Projection of a generated report, appended once per successful `/fetchreport/`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeatherRecord {
    pub id: i64,
    pub city: String,
    /// Air temperature in Celsius, stored at 1 decimal place.
    pub temperature: Decimal,
    pub condition: String,
    pub created_at: DateTime<Utc>,
}
