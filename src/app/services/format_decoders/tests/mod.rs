//! Test utilities for the format decoders
//!
//! Shared fixtures and helpers that run a decoder to completion over an
//! in-memory payload.

use crate::app::models::TelemetryRecord;
use crate::config::{InputFormat, ParserConfig};

use super::{DecodeEvent, FormatDecoder};

mod delimited_tests;

/// Canonical header row
pub const CSV_HEADER: &str = "vehicle_id,timestamp,latitude,longitude,speed,heading,engine_rpm,fuel_level,odometer_km,engine_temp,battery_volt,diagnostic_code";

/// Epoch milliseconds of 2024-01-15T08:00:00Z
pub const JAN_15_0800_MS: i64 = 1_705_305_600_000;

/// Helper to create delimited content with a header and two data rows
pub fn create_test_csv() -> String {
    format!(
        "{}\n\
         VEH-001,2024-01-15T08:00:00,28.5,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,P0420\n\
         VEH-002,1705305600,40.7128,-74.006,0,90,800,15.25,1200.5,70,12.6,\n",
        CSV_HEADER
    )
}

/// Run a decoder over `input` and collect every event
pub fn decode_events(input: &[u8], format: InputFormat, config: &ParserConfig) -> Vec<DecodeEvent> {
    FormatDecoder::new(input, format, config)
        .unwrap()
        .collect::<crate::Result<Vec<_>>>()
        .unwrap()
}

/// Records carried by a list of events
pub fn records(events: &[DecodeEvent]) -> Vec<TelemetryRecord> {
    events
        .iter()
        .filter_map(|event| match event {
            DecodeEvent::Record { record, .. } => Some(record.clone()),
            _ => None,
        })
        .collect()
}

/// Line numbers of rejected events
pub fn rejected_lines(events: &[DecodeEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            DecodeEvent::Rejected { line, .. } => Some(*line),
            _ => None,
        })
        .collect()
}
