use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    config::ApiConfig,
    error::FetchError,
    model::{CityTarget, RawReading},
};

use super::WeatherProvider;

/// Envelope code QWeather uses for a successful answer.
const SUCCESS_CODE: &str = "200";

/// Client for `GET /v7/weather/now`.
#[derive(Clone)]
pub struct QWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for QWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl QWeatherProvider {
    pub fn new(api: &ApiConfig, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_base_url(format!("https://{}", api.host), api.key.clone(), timeout)
    }

    /// Point the client at an arbitrary base URL, e.g. a local test server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn now_request(&self, location_id: &str) -> RequestBuilder {
        self.http
            .get(format!("{}/v7/weather/now", self.base_url))
            .query(&[("location", location_id), ("key", self.api_key.as_str())])
    }

    async fn request_now(&self, city: &CityTarget) -> Result<String, FetchError> {
        let res = self.now_request(&city.location_id).send().await?;

        let status = res.status();
        let body = res.text().await?;

        interpret_response(status, body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: String,
}

/// Accept the body only for a 2xx answer whose envelope code is the success value.
fn interpret_response(status: StatusCode, body: String) -> Result<String, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    let envelope: Envelope = serde_json::from_str(&body).map_err(FetchError::Envelope)?;
    if envelope.code != SUCCESS_CODE {
        return Err(FetchError::Provider {
            code: envelope.code,
            body,
        });
    }

    Ok(body)
}

#[async_trait]
impl WeatherProvider for QWeatherProvider {
    async fn fetch_now(&self, city: &CityTarget) -> Result<RawReading, FetchError> {
        info!(
            city = %city.location_name,
            location_id = %city.location_id,
            "Fetching data for {} ({})",
            city.location_name,
            city.location_id
        );

        match self.request_now(city).await {
            Ok(body) => Ok(RawReading {
                city: city.clone(),
                body,
            }),
            Err(err) => {
                let name = &city.location_name;
                match &err {
                    FetchError::Provider { body, .. } => {
                        error!(city = %name, "API error for {name}: {body}")
                    }
                    _ => error!(city = %name, "Request failed for {name}: {err}"),
                }
                Err(err)
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
