//! Application constants for the fleet telemetry parser
//!
//! This module contains the canonical field layout, binary format constants,
//! default parser settings and validation ranges used throughout the crate.

// =============================================================================
// Canonical Field Layout
// =============================================================================

/// Canonical telemetry field names in positional order
///
/// This order is the default column layout for delimited text, the field order
/// of the binary format and the column order of CSV rendering.
pub const FIELD_NAMES: &[&str] = &[
    "vehicle_id",
    "timestamp",
    "latitude",
    "longitude",
    "speed",
    "heading",
    "engine_rpm",
    "fuel_level",
    "odometer_km",
    "engine_temp",
    "battery_volt",
    "diagnostic_code",
];

/// Number of canonical fields
pub const FIELD_COUNT: usize = 12;

/// Minimum number of delimited fields for a data line to be decoded
///
/// The trailing diagnostic code column is optional.
pub const MIN_DELIMITED_FIELDS: usize = 11;

/// Minimum number of pipe-separated fields in a log line
pub const MIN_LOG_FIELDS: usize = 10;

/// Separator used by the log-line format
pub const LOG_FIELD_SEPARATOR: char = '|';

/// Separator between latitude and longitude inside a log-line field
pub const LOG_COORDINATE_SEPARATOR: char = ',';

/// Prefix marking a comment line in log files
pub const LOG_COMMENT_PREFIX: char = '#';

// =============================================================================
// Binary Format
// =============================================================================

/// Magic constant: ASCII "FLET" as a u32, stored little-endian (`54 45 4C 46` on disk)
pub const BINARY_MAGIC: u32 = 0x464C_4554;

/// Current binary format version
pub const BINARY_VERSION: u8 = 1;

/// Header size in bytes: 4-byte magic + 1-byte version
pub const BINARY_HEADER_SIZE: usize = 5;

/// Maximum encodable length of a length-prefixed string
pub const MAX_BINARY_STRING_LEN: usize = u8::MAX as usize;

/// Fixed-width payload of one record, excluding the two string fields and their
/// length bytes: i64 timestamp + 8 x f64 + i32 rpm
pub const BINARY_FIXED_FIELDS_SIZE: usize = 8 + 8 * 8 + 4;

// =============================================================================
// Parser Defaults
// =============================================================================

/// Default field delimiter for delimited text
pub const DEFAULT_DELIMITER: char = ',';

/// Default advisory batch size for downstream consumers
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default number of benchmark iterations
pub const DEFAULT_BENCHMARK_ITERATIONS: usize = 5;

/// Default number of sample records printed by the CLI
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Maximum number of per-line diagnostics retained in parse statistics
pub const MAX_DIAGNOSTICS: usize = 100;

/// Success rate (percent) above which a parse is considered successful
pub const SUCCESS_RATE_THRESHOLD: f64 = 90.0;

/// Initial capacity for the reused line buffer
pub const LINE_BUFFER_CAPACITY: usize = 512;

/// Estimated bytes per delimited record, used to pre-size result vectors
pub const ESTIMATED_BYTES_PER_RECORD: usize = 100;

// =============================================================================
// Validation Ranges
// =============================================================================

/// Valid latitude range in degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range in degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Valid fuel level range in percent
pub const FUEL_LEVEL_RANGE: (f64, f64) = (0.0, 100.0);

// =============================================================================
// Timestamps
// =============================================================================

/// Sentinel timestamp for "unset or unparseable"
pub const TIMESTAMP_SENTINEL: i64 = 0;

/// Longest bare digit string accepted as a Unix timestamp
pub const MAX_UNIX_DIGITS: usize = 13;

/// Bare digit strings up to this length are seconds, longer ones milliseconds
pub const MAX_UNIX_SECONDS_DIGITS: usize = 10;

/// Year range over which the simplified leap-year count is exact
pub const FAST_PATH_YEAR_RANGE: (i32, i32) = (1970, 2099);

/// Fallback timestamp formats without timezone, tried in order
pub const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only fallback format (interpreted as midnight UTC)
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout_constants() {
        assert_eq!(FIELD_NAMES.len(), FIELD_COUNT);
        assert_eq!(FIELD_NAMES[0], "vehicle_id");
        assert_eq!(FIELD_NAMES[FIELD_COUNT - 1], "diagnostic_code");
        assert!(MIN_DELIMITED_FIELDS < FIELD_COUNT);
    }

    #[test]
    fn test_binary_magic_spells_flet() {
        let bytes = BINARY_MAGIC.to_be_bytes();
        assert_eq!(&bytes, b"FLET");
        assert_eq!(BINARY_FIXED_FIELDS_SIZE, 76);
    }
}
