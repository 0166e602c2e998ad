//! Core library for the hourly weather ETL.
//!
//! This crate defines:
//! - Environment-sourced configuration
//! - The QWeather fetcher behind the `WeatherProvider` trait
//! - Transformation and validation of readings into `WeatherRecord`s
//! - Transactional loading into `weather_now` behind the `WeatherStore` trait
//! - The pipeline orchestrator, the post-load quality gate and the run summary
//!
//! It is used by `weather-etl`, but the pipeline can be driven by any
//! scheduler that runs the ETL step and then the quality step.

pub mod config;
pub mod error;
pub mod load;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod provider;
pub mod quality;
pub mod store;
pub mod transform;
pub mod validate;

pub use config::Config;
pub use error::{
    ConfigError, FetchError, PipelineError, QualityError, StoreError, TransformError,
    ValidationError,
};
pub use model::{CityCount, CityTarget, RawReading, RunOutcome, WeatherRecord};
pub use pipeline::{CityOutcome, Pipeline};
pub use provider::WeatherProvider;
pub use quality::{QualityGate, QualityReport};
pub use store::WeatherStore;
