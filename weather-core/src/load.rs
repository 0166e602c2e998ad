use tracing::{error, info, warn};

use crate::{error::StoreError, model::WeatherRecord, store::WeatherStore, validate::validate};

/// Result of one load call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub received: usize,
    pub rejected: usize,
    pub persisted: usize,
}

/// Validates a run's records and writes the survivors in one batch.
#[derive(Debug)]
pub struct Loader<S> {
    store: S,
}

impl<S: WeatherStore> Loader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate then insert.
    ///
    /// Invalid records are dropped. The store is not touched when nothing is
    /// left to write. A store failure is returned as-is; nothing from the
    /// batch is persisted in that case.
    pub async fn load(&self, records: Vec<WeatherRecord>) -> Result<LoadReport, StoreError> {
        let mut report = LoadReport {
            received: records.len(),
            ..LoadReport::default()
        };

        if records.is_empty() {
            warn!("No data to load");
            return Ok(report);
        }

        let valid: Vec<WeatherRecord> = records
            .into_iter()
            .filter(|record| match validate(record) {
                Ok(()) => true,
                Err(reason) => {
                    let name = &record.city_name;
                    warn!(city = %name, "Dropping invalid record for {name}: {reason}");
                    false
                }
            })
            .collect();
        report.rejected = report.received - valid.len();

        if valid.is_empty() {
            error!("No valid data to insert");
            return Ok(report);
        }

        match self.store.insert_batch(&valid).await {
            Ok(written) => {
                report.persisted = written as usize;
                info!("Successfully inserted {} records", report.persisted);
                Ok(report)
            }
            Err(e) => {
                error!("Failed to load data: {e}");
                Err(e)
            }
        }
    }
}
