//! Data models for telemetry processing
//!
//! This module contains the canonical decoded telemetry record shared by every
//! input format, the binary codec and the downstream storage sink.

use crate::app::services::record_validator;
use serde::{Deserialize, Serialize};

// =============================================================================
// Telemetry Record Structure
// =============================================================================

/// One decoded telemetry reading for one vehicle at one instant
///
/// Field order matches the canonical column layout in
/// [`FIELD_NAMES`](crate::constants::FIELD_NAMES).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Vehicle identifier (non-empty for a valid record)
    pub vehicle_id: String,

    /// Milliseconds since the Unix epoch (0 = unset/unparseable)
    pub timestamp: i64,

    /// Latitude in decimal degrees, [-90, 90]
    pub latitude: f64,

    /// Longitude in decimal degrees, [-180, 180]
    pub longitude: f64,

    /// Ground speed in km/h, >= 0
    pub speed: f64,

    /// Heading in degrees
    pub heading: f64,

    /// Engine speed in revolutions per minute, >= 0
    pub engine_rpm: i32,

    /// Fuel level in percent, [0, 100]
    pub fuel_level: f64,

    /// Odometer reading in kilometres
    pub odometer_km: f64,

    /// Engine temperature in degrees Celsius
    pub engine_temp: f64,

    /// Battery voltage
    pub battery_volt: f64,

    /// Fault code; empty means no fault
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub diagnostic_code: String,
}

impl TelemetryRecord {
    /// Create a record with the identifying fields set and everything else zeroed
    pub fn new(vehicle_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            timestamp,
            ..Default::default()
        }
    }

    /// Check the record against the field-range invariants
    pub fn is_valid(&self) -> bool {
        record_validator::is_valid(self)
    }

    /// Describe every range violation on this record
    pub fn validation_issues(&self) -> Vec<String> {
        record_validator::validation_issues(self)
    }

    /// Whether the record carries a fault code
    pub fn has_diagnostic(&self) -> bool {
        !self.diagnostic_code.is_empty()
    }

    /// Whether the timestamp was set to a real instant
    pub fn has_timestamp(&self) -> bool {
        self.timestamp != crate::constants::TIMESTAMP_SENTINEL
    }

    /// Render the record as one line of canonical delimited text
    ///
    /// Coordinates keep 6 decimals, the remaining floating point fields 2.
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{:.6},{:.6},{:.2},{:.2},{},{:.2},{:.2},{:.2},{:.2},{}",
            self.vehicle_id,
            self.timestamp,
            self.latitude,
            self.longitude,
            self.speed,
            self.heading,
            self.engine_rpm,
            self.fuel_level,
            self.odometer_km,
            self.engine_temp,
            self.battery_volt,
            self.diagnostic_code
        )
    }

    /// Render the record as a compact JSON object
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::Error::serialization("Failed to encode telemetry record", e))
    }
}
