use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt::Debug, sync::Arc};

use crate::{
    error::StoreError,
    model::{CityCount, WeatherRecord},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgWeatherStore;

/// Target table for normalized readings.
pub const TABLE: &str = "weather_now";

/// Persistence for weather records.
#[async_trait]
pub trait WeatherStore: Send + Sync + Debug {
    /// Append `records` in a single transaction. Either every row becomes
    /// visible or none does. Returns the number of rows written.
    async fn insert_batch(&self, records: &[WeatherRecord]) -> Result<u64, StoreError>;

    /// Row count per city for rows with `insert_ts >= since`.
    ///
    /// Cities without rows in the window are absent from the result.
    async fn city_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<CityCount>, StoreError>;
}

#[async_trait]
impl<S: WeatherStore + ?Sized> WeatherStore for Arc<S> {
    async fn insert_batch(&self, records: &[WeatherRecord]) -> Result<u64, StoreError> {
        (**self).insert_batch(records).await
    }

    async fn city_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<CityCount>, StoreError> {
        (**self).city_counts_since(since).await
    }
}
