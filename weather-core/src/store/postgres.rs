use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    PgPool, Postgres, QueryBuilder,
    postgres::PgPoolOptions,
};
use tracing::debug;

use crate::{
    config::DatabaseConfig,
    error::StoreError,
    model::{CityCount, WeatherRecord},
};

use super::{TABLE, WeatherStore};

const INSERT_COLUMNS: &str = "city_name, city_id, update_time, temp, feels_like, text, \
                              wind_scale, humidity, pressure, vis, cloud, insert_ts";

/// `weather_now` backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgWeatherStore {
    pool: PgPool,
}

impl PgWeatherStore {
    /// Open a bounded pool sized by `db.min_connections` / `db.max_connections`.
    pub async fn connect(db: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(db.min_connections)
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&db.url())
            .await?;

        debug!(host = %db.host, db = %db.name, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn insert_query(records: &[WeatherRecord]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("INSERT INTO {TABLE} ({INSERT_COLUMNS}) "));

    qb.push_values(records, |mut row, r| {
        row.push_bind(r.city_name.clone())
            .push_bind(r.city_id.clone())
            .push_bind(r.update_time)
            .push_bind(r.temp)
            .push_bind(r.feels_like)
            .push_bind(r.text.clone())
            .push_bind(r.wind_scale.clone())
            .push_bind(r.humidity)
            .push_bind(r.pressure)
            .push_bind(r.vis)
            .push_bind(r.cloud.clone())
            .push_bind(r.insert_ts);
    });

    qb
}

#[async_trait]
impl WeatherStore for PgWeatherStore {
    async fn insert_batch(&self, records: &[WeatherRecord]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        // Dropping `tx` without commit rolls the whole batch back.
        let mut tx = self.pool.begin().await?;
        let result = insert_query(records).build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn city_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<CityCount>, StoreError> {
        let rows = sqlx::query_as::<_, CityCount>(&format!(
            "SELECT city_name, COUNT(*) AS count FROM {TABLE} \
             WHERE insert_ts >= $1 GROUP BY city_name ORDER BY city_name"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
