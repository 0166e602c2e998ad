//! Error types for each stage of the ETL run.
//!
//! Per-city errors ([`FetchError`], [`TransformError`], [`ValidationError`])
//! are recovered by the pipeline. [`ConfigError`], [`StoreError`] and
//! [`QualityError`] end the step they occur in.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),

    #[error("{0} must list at least one location")]
    EmptyList(&'static str),

    #[error(
        "QWEATHER_LOCATIONS has {ids} entries but QWEATHER_LOCATION_NAMES has {names}; \
         both lists must have the same length and order"
    )]
    LengthMismatch { ids: usize, names: usize },

    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider answered with HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider reported error code {code}: {body}")]
    Provider { code: String, body: String },

    #[error("response envelope is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("malformed provider payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{field}` has an unusable value: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("cannot parse update time {0:?}")]
    Timestamp(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("temperature {0} °C is outside [-50, 50]")]
    TemperatureOutOfRange(f64),

    #[error("humidity {0}% is outside [0, 100]")]
    HumidityOutOfRange(i32),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Raised by non-database stores, e.g. the in-memory store used for dry runs and tests.
    #[error("store failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load weather records: {0}")]
    Load(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum QualityError {
    #[error("Missing data for cities: {}", .0.join(", "))]
    MissingCities(Vec<String>),

    #[error("No data found for {0} in the quality window")]
    ZeroCount(String),

    #[error("quality window of {0} reaches past the supported date range")]
    WindowOutOfRange(chrono::Duration),

    #[error("quality query failed: {0}")]
    Store(#[from] StoreError),
}
