//! Conversion of a raw QWeather `/v7/weather/now` body into a [`WeatherRecord`].
//!
//! QWeather encodes numbers as JSON strings (`"temp": "24"`); both strings and
//! plain numbers are accepted here.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::TransformError,
    model::{RawReading, WeatherRecord},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NowResponse {
    update_time: String,
    now: NowBlock,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NowBlock {
    temp: Value,
    feels_like: Value,
    text: String,
    wind_scale: Value,
    humidity: Value,
    #[serde(default)]
    pressure: Option<Value>,
    #[serde(default)]
    vis: Option<Value>,
    #[serde(default)]
    cloud: Option<Value>,
}

/// Transform a fetched reading, stamping `insert_ts` with `now`.
pub fn transform_reading(
    raw: &RawReading,
    now: DateTime<Utc>,
) -> Result<WeatherRecord, TransformError> {
    transform(&raw.body, &raw.city.location_name, &raw.city.location_id, now)
}

/// Pure transformation of one provider body.
///
/// Structural defects (missing fields, values that do not cast) are returned
/// as errors; range checks are left to [`crate::validate`].
pub fn transform(
    body: &str,
    city_name: &str,
    city_id: &str,
    now: DateTime<Utc>,
) -> Result<WeatherRecord, TransformError> {
    let parsed: NowResponse = serde_json::from_str(body)?;
    let n = parsed.now;

    Ok(WeatherRecord {
        city_name: city_name.to_string(),
        city_id: city_id.to_string(),
        update_time: parse_update_time(&parsed.update_time)?,
        temp: to_f64("temp", &n.temp)?,
        feels_like: to_f64("feelsLike", &n.feels_like)?,
        text: n.text,
        wind_scale: to_text("windScale", &n.wind_scale)?,
        humidity: to_i32("humidity", &n.humidity)?,
        pressure: optional_int("pressure", n.pressure.as_ref())?,
        vis: optional_int("vis", n.vis.as_ref())?,
        cloud: n
            .cloud
            .as_ref()
            .filter(|v| !v.is_null())
            .map(|v| to_text("cloud", v))
            .transpose()?,
        insert_ts: now,
    })
}

/// Parse an ISO-8601 observation time.
///
/// A trailing `Z` becomes `+00:00`. QWeather omits seconds
/// (`2024-05-01T12:00+08:00`), so that form is accepted as well.
pub fn parse_update_time(raw: &str) -> Result<DateTime<FixedOffset>, TransformError> {
    let normalized = match raw.trim().strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.trim().to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z"))
        .map_err(|_| TransformError::Timestamp(raw.to_string()))
}

fn invalid(field: &'static str, value: &Value) -> TransformError {
    TransformError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn to_f64(field: &'static str, value: &Value) -> Result<f64, TransformError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(field, value))
}

fn to_i32(field: &'static str, value: &Value) -> Result<i32, TransformError> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(field, value))
}

/// Scalar as text. `null`, arrays and objects are not a value for a text column.
fn to_text(field: &'static str, value: &Value) -> Result<String, TransformError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(invalid(field, value)),
    }
}

/// Falsy values (absent, null, false, 0, "") never become `Some`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Optional integer field: unset when the source value is falsy or casts to zero.
fn optional_int(field: &'static str, value: Option<&Value>) -> Result<Option<i32>, TransformError> {
    match value {
        Some(v) if is_truthy(v) => {
            let n = to_i32(field, v)?;
            Ok((n != 0).then_some(n))
        }
        _ => Ok(None),
    }
}
