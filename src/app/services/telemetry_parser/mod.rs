//! Telemetry parsing pipeline
//!
//! This module turns raw telemetry input in any supported format into a
//! validated record stream with skip-and-count semantics: a bad line is
//! counted and dropped, never aborting the parse. Only source-level failures
//! (unreadable input, bad binary header) end a call early.
//!
//! ## Architecture
//!
//! - [`parser`] - Parse orchestration, policy and bulk/streaming modes
//! - [`stats`] - Parse statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use fleet_telemetry::{InputFormat, ParserConfig, TelemetryParser};
//!
//! # fn example() -> fleet_telemetry::Result<()> {
//! let input = "vehicle_id,timestamp,latitude,longitude,speed,heading,engine_rpm,fuel_level,odometer_km,engine_temp,battery_volt,diagnostic_code\n\
//!              VEH-001,2024-01-15T08:00:00,28.5,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,P0420\n";
//!
//! let mut parser = TelemetryParser::new(ParserConfig::default())?;
//! let result = parser.parse(input.as_bytes(), InputFormat::Csv)?;
//!
//! println!("Parsed {} records", result.stats.valid_records);
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{BenchmarkReport, TelemetryParser};
pub use stats::{ParseResult, ParseStatistics};
