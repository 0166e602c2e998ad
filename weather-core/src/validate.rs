use std::ops::RangeInclusive;

use crate::{error::ValidationError, model::WeatherRecord};

pub const TEMP_RANGE_C: RangeInclusive<f64> = -50.0..=50.0;
pub const HUMIDITY_RANGE: RangeInclusive<i32> = 0..=100;

/// Check that a record is complete and within physical bounds before it is persisted.
///
/// A non-finite temperature or a blank condition text counts as missing.
pub fn validate(record: &WeatherRecord) -> Result<(), ValidationError> {
    if !record.temp.is_finite() {
        return Err(ValidationError::MissingField("temp"));
    }
    if record.text.trim().is_empty() {
        return Err(ValidationError::MissingField("text"));
    }
    if !TEMP_RANGE_C.contains(&record.temp) {
        return Err(ValidationError::TemperatureOutOfRange(record.temp));
    }
    if !HUMIDITY_RANGE.contains(&record.humidity) {
        return Err(ValidationError::HumidityOutOfRange(record.humidity));
    }
    Ok(())
}
