use crate::{
    Config,
    error::FetchError,
    model::{CityTarget, RawReading},
    provider::qweather::QWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod qweather;

/// Source of current-weather readings, one request per city.
///
/// Implementations never retry; a failed city is reported through the
/// returned error and the caller moves on to the next one.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_now(&self, city: &CityTarget) -> Result<RawReading, FetchError>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn fetch_now(&self, city: &CityTarget) -> Result<RawReading, FetchError> {
        (**self).fetch_now(city).await
    }
}

/// Construct the QWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = QWeatherProvider::new(&config.api, config.fetch_timeout).map_err(|e| {
        anyhow::anyhow!("Failed to build HTTP client for QWeather ({}): {e}", config.api.host)
    })?;

    Ok(Box::new(provider))
}
