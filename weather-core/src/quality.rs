//! Post-load check that every configured city has rows in the recent window.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::{error::QualityError, model::CityCount, store::WeatherStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub counts: Vec<CityCount>,
}

impl QualityReport {
    pub fn total_rows(&self) -> i64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}

/// Compare grouped counts against the configured city names.
///
/// Missing cities are reported together, sorted. The zero-count check cannot
/// fire for results of a `GROUP BY` query but is kept as a guard.
pub fn evaluate(expected: &[String], counts: &[CityCount]) -> Result<QualityReport, QualityError> {
    let present: BTreeSet<&str> = counts.iter().map(|c| c.city_name.as_str()).collect();

    let missing: Vec<String> = expected
        .iter()
        .map(String::as_str)
        .filter(|name| !present.contains(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(QualityError::MissingCities(missing));
    }

    if let Some(empty) = counts.iter().find(|c| c.count == 0) {
        return Err(QualityError::ZeroCount(empty.city_name.clone()));
    }

    Ok(QualityReport {
        counts: counts.to_vec(),
    })
}

#[derive(Debug)]
pub struct QualityGate<S> {
    store: S,
    expected: Vec<String>,
    window: Duration,
}

impl<S: WeatherStore> QualityGate<S> {
    pub fn new(store: S, expected: Vec<String>, window: Duration) -> Self {
        Self {
            store,
            expected,
            window,
        }
    }

    /// Query the window ending now and evaluate it.
    pub async fn check(&self) -> Result<QualityReport, QualityError> {
        let since = Utc::now()
            .checked_sub_signed(self.window)
            .ok_or(QualityError::WindowOutOfRange(self.window))?;
        let counts = self.store.city_counts_since(since).await?;

        let report = evaluate(&self.expected, &counts)?;

        let found = report
            .counts
            .iter()
            .map(|c| format!("{}: {}", c.city_name, c.count))
            .collect::<Vec<_>>()
            .join(", ");
        info!("Data quality check passed. Records found: {{{found}}}");

        Ok(report)
    }
}
