//! Compact binary telemetry format
//!
//! A symmetric encoder/decoder for the length-prefixed little-endian record
//! stream described in [`format`]. The decoder is one of the parser's input
//! formats; the encoder turns any parsed record stream into a file that can be
//! reloaded without text parsing.
//!
//! ## Usage
//!
//! ```rust
//! use fleet_telemetry::app::services::binary_codec::{decode_records, encode_records};
//! use fleet_telemetry::TelemetryRecord;
//!
//! # fn example() -> fleet_telemetry::Result<()> {
//! let records = vec![TelemetryRecord::new("VEH-001", 1_705_305_600_000)];
//! let bytes = encode_records(&records)?;
//! assert_eq!(decode_records(&bytes)?, records);
//! # Ok(())
//! # }
//! ```

pub mod format;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use format::BinaryHeader;
pub use reader::{BinaryReader, decode_records};
pub use writer::{BinaryWriter, encode_records, truncate_utf8};
