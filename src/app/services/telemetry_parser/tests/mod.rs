//! Test utilities for the telemetry parser

use std::io::Write;
use tempfile::NamedTempFile;

// Test modules
mod parser_tests;
mod stats_tests;

/// Canonical header row
pub const CSV_HEADER: &str = "vehicle_id,timestamp,latitude,longitude,speed,heading,engine_rpm,fuel_level,odometer_km,engine_temp,battery_volt,diagnostic_code";

/// Helper to create delimited content: three valid rows, one short row and
/// one row with an out-of-range latitude
pub fn create_mixed_csv() -> String {
    [
        CSV_HEADER,
        "VEH-001,2024-01-15T08:00:00,28.5,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,P0420",
        "VEH-002,1705305600,40.7,-74.0,0,90,800,15.2,1200.5,70,12.6,",
        "VEH-003,5 minutes ago,51.5,-0.1,30,270,1500,50,800,80,12.4,",
        "VEH-004,2024-01-15T08:00:00,28.5",
        "VEH-005,2024-01-15T08:00:00,123.0,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,",
    ]
    .join("\n")
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
