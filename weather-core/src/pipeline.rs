//! Orchestration of one ETL run: fetch and transform each configured city in
//! order, then validate and load the whole batch at once.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    error::{FetchError, PipelineError, TransformError},
    load::Loader,
    model::{CityTarget, RunOutcome, WeatherRecord},
    provider::WeatherProvider,
    store::WeatherStore,
    transform::transform_reading,
};

/// What happened to a single city during extraction.
#[derive(Debug)]
pub enum CityOutcome {
    Fetched(WeatherRecord),
    FetchFailed(FetchError),
    Malformed(TransformError),
}

impl CityOutcome {
    pub fn into_record(self) -> Option<WeatherRecord> {
        match self {
            CityOutcome::Fetched(record) => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Pipeline<P, S> {
    provider: P,
    loader: Loader<S>,
    cities: Vec<CityTarget>,
}

impl<P: WeatherProvider, S: WeatherStore> Pipeline<P, S> {
    pub fn new(provider: P, store: S, cities: Vec<CityTarget>) -> Self {
        Self {
            provider,
            loader: Loader::new(store),
            cities,
        }
    }

    pub fn store(&self) -> &S {
        self.loader.store()
    }

    /// Fetch and transform one city. Never fails; the outcome carries the reason.
    pub async fn extract(&self, city: &CityTarget) -> CityOutcome {
        let raw = match self.provider.fetch_now(city).await {
            Ok(raw) => raw,
            Err(e) => return CityOutcome::FetchFailed(e),
        };

        match transform_reading(&raw, Utc::now()) {
            Ok(record) => CityOutcome::Fetched(record),
            Err(e) => {
                let name = &city.location_name;
                error!(city = %name, "Unexpected error for {name}: {e}");
                CityOutcome::Malformed(e)
            }
        }
    }

    /// Run the full ETL once.
    ///
    /// Per-city failures only shrink the batch. A run in which no city
    /// produced data still succeeds; only a load failure is an error.
    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        info!("Starting Weather ETL Pipeline");

        let mut outcome = RunOutcome {
            attempted: self.cities.len(),
            ..RunOutcome::default()
        };
        let mut pending = Vec::with_capacity(self.cities.len());

        for city in &self.cities {
            match self.extract(city).await.into_record() {
                Some(record) => {
                    debug!("Successfully processed {}", city.location_name);
                    pending.push(record);
                }
                None => outcome.failed_cities.push(city.location_name.clone()),
            }
        }

        outcome.fetched = pending.len();
        info!(
            fetched = outcome.fetched,
            attempted = outcome.attempted,
            "Fetched data for {}/{} cities",
            outcome.fetched,
            outcome.attempted
        );

        if pending.is_empty() {
            warn!("No data was fetched from any city");
        } else {
            let report = self.loader.load(pending).await?;
            outcome.persisted = report.persisted;
            outcome.rejected = report.rejected;
            info!(
                received = report.received,
                rejected = report.rejected,
                "Validated {} records, {} rejected",
                report.received,
                report.rejected
            );
        }

        info!(
            persisted = outcome.persisted,
            "Weather ETL Pipeline completed: {} records persisted",
            outcome.persisted
        );
        Ok(outcome)
    }
}
