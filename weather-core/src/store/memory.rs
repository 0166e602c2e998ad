use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::StoreError,
    model::{CityCount, WeatherRecord},
};

use super::WeatherStore;

/// In-process store with the same all-or-nothing batch semantics as the
/// PostgreSQL store. Used by `--dry-run` and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<WeatherRecord>>,
    batches: Mutex<usize>,
    fail_after: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`, as if committed by earlier runs.
    pub fn with_rows(rows: Vec<WeatherRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Make the next batch fail after staging `n` rows.
    pub fn fail_next_batch_after(&self, n: usize) {
        *lock(&self.fail_after) = Some(n);
    }

    /// Committed rows.
    pub fn rows(&self) -> Vec<WeatherRecord> {
        lock(&self.rows).clone()
    }

    /// Number of `insert_batch` calls, successful or not.
    pub fn batch_calls(&self) -> usize {
        *lock(&self.batches)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl WeatherStore for MemoryStore {
    async fn insert_batch(&self, records: &[WeatherRecord]) -> Result<u64, StoreError> {
        *lock(&self.batches) += 1;
        let fail_after = lock(&self.fail_after).take();

        let mut staged = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if fail_after == Some(i) {
                return Err(StoreError::Backend(format!(
                    "injected failure after {i} of {} rows",
                    records.len()
                )));
            }
            staged.push(record.clone());
        }

        let written = staged.len() as u64;
        lock(&self.rows).extend(staged);
        Ok(written)
    }

    async fn city_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<CityCount>, StoreError> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for row in lock(&self.rows).iter().filter(|r| r.insert_ts >= since) {
            *counts.entry(row.city_name.clone()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(city_name, count)| CityCount { city_name, count })
            .collect())
    }
}
