//! Test utilities for the binary codec

use crate::app::models::TelemetryRecord;

mod roundtrip_tests;

/// A record exercising every field with non-trivial values
pub fn create_test_record() -> TelemetryRecord {
    TelemetryRecord {
        vehicle_id: "VEH-001".to_string(),
        timestamp: 1_705_305_600_000,
        latitude: 28.538336,
        longitude: -81.379234,
        speed: 65.5,
        heading: 180.25,
        engine_rpm: 2800,
        fuel_level: 72.5,
        odometer_km: 52341.2,
        engine_temp: 85.2,
        battery_volt: 12.8,
        diagnostic_code: "P0420".to_string(),
    }
}
