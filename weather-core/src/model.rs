use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// One configured location to poll: the provider's location id paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityTarget {
    pub location_id: String,
    pub location_name: String,
}

impl CityTarget {
    pub fn new(location_id: impl Into<String>, location_name: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            location_name: location_name.into(),
        }
    }
}

/// Unparsed provider body for one fetch attempt.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub city: CityTarget,
    pub body: String,
}

/// Normalized observation, one row of `weather_now`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    pub city_id: String,
    /// Observation time as reported by the provider.
    pub update_time: DateTime<FixedOffset>,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub text: String,
    pub wind_scale: String,
    pub pressure: Option<i32>,
    pub vis: Option<i32>,
    pub cloud: Option<String>,
    /// Wall-clock time of transformation, not provider time.
    pub insert_ts: DateTime<Utc>,
}

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub attempted: usize,
    /// Cities for which a record was produced (before validation).
    pub fetched: usize,
    /// Fetched records dropped by validation.
    pub rejected: usize,
    pub persisted: usize,
    pub failed_cities: Vec<String>,
}

/// Row count for one city inside the quality window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CityCount {
    pub city_name: String,
    pub count: i64,
}

impl CityCount {
    pub fn new(city_name: impl Into<String>, count: i64) -> Self {
        Self {
            city_name: city_name.into(),
            count,
        }
    }
}
