//! Store contracts for the `cities` and `weather_data` tables.
//!
//! Handlers and the report generator only see these traits; `PgStore` is the
//! production implementation. Concurrent writes are serialized by Postgres.

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{City, WeatherRecord};
use super::queries::{self, InsertWeatherRecordParams};
use crate::helpers::f64_to_decimal_1dp;

/// The persisted projection of a generated report.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeatherRecord {
    pub city: String,
    pub temperature_c: f64,
    pub condition: String,
}

#[async_trait]
pub trait CityStore: Send + Sync {
    /// All cities in insertion order.
    async fn list(&self) -> Result<Vec<City>, sqlx::Error>;

    /// Insert without any uniqueness check.
    async fn insert(&self, name: &str) -> Result<City, sqlx::Error>;

    /// Delete by id. Deleting an unknown id is not an error; returns whether a row matched.
    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn append(&self, record: NewWeatherRecord) -> Result<WeatherRecord, sqlx::Error>;

    async fn recent(
        &self,
        city: Option<&str>,
        limit: i64,
    ) -> Result<Vec<WeatherRecord>, sqlx::Error>;
}

/// Postgres-backed implementation of both stores.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CityStore for PgStore {
    async fn list(&self) -> Result<Vec<City>, sqlx::Error> {
        queries::list_cities(&self.pool).await
    }

    async fn insert(&self, name: &str) -> Result<City, sqlx::Error> {
        queries::insert_city(&self.pool, name).await
    }

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        Ok(queries::delete_city(&self.pool, id).await? > 0)
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn append(&self, record: NewWeatherRecord) -> Result<WeatherRecord, sqlx::Error> {
        queries::insert_weather_record(
            &self.pool,
            InsertWeatherRecordParams {
                city: record.city,
                temperature: f64_to_decimal_1dp(record.temperature_c),
                condition: record.condition,
            },
        )
        .await
    }

    async fn recent(
        &self,
        city: Option<&str>,
        limit: i64,
    ) -> Result<Vec<WeatherRecord>, sqlx::Error> {
        queries::list_weather_records(&self.pool, city, limit).await
    }
}

/// In-memory stores for unit tests.
#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryStore {
        cities: Mutex<Vec<City>>,
        records: Mutex<Vec<WeatherRecord>>,
        next_id: Mutex<i64>,
        /// When set, every `append` fails.
        pub(crate) fail_appends: AtomicBool,
    }

    impl MemoryStore {
        pub(crate) fn with_cities(names: &[&str]) -> Self {
            let store = Self::default();
            {
                let mut cities = store.cities.lock().unwrap();
                let mut next_id = store.next_id.lock().unwrap();
                for name in names {
                    *next_id += 1;
                    cities.push(City {
                        id: *next_id,
                        name: name.to_string(),
                        created_at: Utc::now(),
                    });
                }
            }
            store
        }

        pub(crate) fn records(&self) -> Vec<WeatherRecord> {
            self.records.lock().unwrap().clone()
        }

        pub(crate) fn city_names(&self) -> Vec<String> {
            self.cities
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CityStore for MemoryStore {
        async fn list(&self) -> Result<Vec<City>, sqlx::Error> {
            Ok(self.cities.lock().unwrap().clone())
        }

        async fn insert(&self, name: &str) -> Result<City, sqlx::Error> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let city = City {
                id: *next_id,
                name: name.to_string(),
                created_at: Utc::now(),
            };
            self.cities.lock().unwrap().push(city.clone());
            Ok(city)
        }

        async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
            let mut cities = self.cities.lock().unwrap();
            let before = cities.len();
            cities.retain(|c| c.id != id);
            Ok(cities.len() != before)
        }
    }

    #[async_trait]
    impl ReportStore for MemoryStore {
        async fn append(&self, record: NewWeatherRecord) -> Result<WeatherRecord, sqlx::Error> {
            if self.fail_appends.load(Ordering::SeqCst) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            let mut records = self.records.lock().unwrap();
            let row = WeatherRecord {
                id: records.len() as i64 + 1,
                city: record.city,
                temperature: f64_to_decimal_1dp(record.temperature_c),
                condition: record.condition,
                created_at: Utc::now(),
            };
            records.push(row.clone());
            Ok(row)
        }

        async fn recent(
            &self,
            city: Option<&str>,
            limit: i64,
        ) -> Result<Vec<WeatherRecord>, sqlx::Error> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|r| city.map_or(true, |c| r.city == c))
                .take(limit.max(0) as usize)
                .cloned()
                .collect())
        }
    }
}
