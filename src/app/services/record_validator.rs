//! Field-range validation for decoded telemetry records
//!
//! Validation is a pure predicate plus a diagnostic producer. The parser
//! decides whether a failing record is rejected (validation enabled) or passed
//! through unchecked.

use crate::app::models::TelemetryRecord;
use crate::constants::{FUEL_LEVEL_RANGE, LATITUDE_RANGE, LONGITUDE_RANGE};
use crate::{Error, Result};

/// Check if a record satisfies every field-range invariant
///
/// A record is valid iff `vehicle_id` is non-empty and latitude, longitude,
/// speed, fuel level and engine rpm are within range. NaN fails every range.
pub fn is_valid(record: &TelemetryRecord) -> bool {
    !record.vehicle_id.is_empty()
        && in_range(record.latitude, LATITUDE_RANGE)
        && in_range(record.longitude, LONGITUDE_RANGE)
        && record.speed >= 0.0
        && in_range(record.fuel_level, FUEL_LEVEL_RANGE)
        && record.engine_rpm >= 0
}

/// Describe every range violation on a record
///
/// Returns an empty vector for a valid record.
pub fn validation_issues(record: &TelemetryRecord) -> Vec<String> {
    let mut issues = Vec::new();

    if record.vehicle_id.is_empty() {
        issues.push("vehicle_id is required".to_string());
    }
    if !in_range(record.latitude, LATITUDE_RANGE) {
        issues.push(format!(
            "latitude must be between -90 and 90 (got {})",
            record.latitude
        ));
    }
    if !in_range(record.longitude, LONGITUDE_RANGE) {
        issues.push(format!(
            "longitude must be between -180 and 180 (got {})",
            record.longitude
        ));
    }
    if !(record.speed >= 0.0) {
        issues.push(format!("speed cannot be negative (got {})", record.speed));
    }
    if !in_range(record.fuel_level, FUEL_LEVEL_RANGE) {
        issues.push(format!(
            "fuel_level must be between 0 and 100 (got {})",
            record.fuel_level
        ));
    }
    if record.engine_rpm < 0 {
        issues.push(format!(
            "engine_rpm cannot be negative (got {})",
            record.engine_rpm
        ));
    }

    issues
}

/// Validate a record, returning a [`Error::Validation`] listing every issue
pub fn validate(record: &TelemetryRecord) -> Result<()> {
    let issues = validation_issues(record);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(issues))
    }
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}
