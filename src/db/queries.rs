use rust_decimal::Decimal;
use sqlx::PgPool;

use super::models::{City, WeatherRecord};

/// Parameters for appending a report record.
pub struct InsertWeatherRecordParams {
    pub city: String,
    pub temperature: Decimal,
    pub condition: String,
}

/// List all cities in insertion order.
pub async fn list_cities(pool: &PgPool) -> Result<Vec<City>, sqlx::Error> {
    sqlx::query_as::<_, City>("SELECT id, name, created_at FROM cities ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Insert a city. Duplicate names are stored as separate rows.
pub async fn insert_city(pool: &PgPool, name: &str) -> Result<City, sqlx::Error> {
    sqlx::query_as::<_, City>(
        "INSERT INTO cities (name, created_at) VALUES ($1, NOW())
         RETURNING id, name, created_at",
    )
    .bind(name)
    .fetch_one(pool)
    .await
}

/// Delete a city by id. Returns the number of rows removed (0 or 1).
pub async fn delete_city(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Insert a report record (append-only).
pub async fn insert_weather_record(
    pool: &PgPool,
    params: InsertWeatherRecordParams,
) -> Result<WeatherRecord, sqlx::Error> {
    sqlx::query_as::<_, WeatherRecord>(
        "INSERT INTO weather_data (city, temperature, condition, created_at)
         VALUES ($1, $2, $3, NOW())
         RETURNING id, city, temperature, condition, created_at",
    )
    .bind(&params.city)
    .bind(params.temperature)
    .bind(&params.condition)
    .fetch_one(pool)
    .await
}

/// Most recent report records, newest first, optionally for a single city.
pub async fn list_weather_records(
    pool: &PgPool,
    city: Option<&str>,
    limit: i64,
) -> Result<Vec<WeatherRecord>, sqlx::Error> {
    sqlx::query_as::<_, WeatherRecord>(
        "SELECT id, city, temperature, condition, created_at
         FROM weather_data
         WHERE $1::TEXT IS NULL OR city = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2",
    )
    .bind(city)
    .bind(limit)
    .fetch_all(pool)
    .await
}
