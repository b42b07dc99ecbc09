//! Fleet Telemetry Library
//!
//! A Rust library for turning heterogeneous vehicle telemetry input into a
//! uniform, validated stream of records.
//!
//! This library provides tools for:
//! - Parsing delimited text, pipe-delimited log lines, JSON (array or
//!   newline-delimited) and a compact length-prefixed binary format
//! - Normalizing timestamps from several textual conventions to epoch milliseconds
//! - Validating field ranges with per-record skip-and-count semantics
//! - Bulk and streaming parse modes with throughput statistics
//! - Encoding record streams back into the binary format for fast reloading

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod binary_codec;
        pub mod format_decoders;
        pub mod record_validator;
        pub mod telemetry_parser;
        pub mod timestamp_normalizer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::TelemetryRecord;
pub use app::services::binary_codec::{BinaryReader, BinaryWriter};
pub use app::services::telemetry_parser::{ParseResult, ParseStatistics, TelemetryParser};
pub use config::{InputFormat, ParserConfig};

/// Result type alias for the telemetry parser
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for telemetry parsing operations
///
/// Only source-level failures (`Io`, `Format`) and setup failures
/// (`Configuration`, `Serialization`) escape a parse call. Record-level
/// variants are produced per line and absorbed into the parse statistics.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Source could not be opened or read
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Binary header magic/version mismatch
    #[error("Binary format error: {message}")]
    Format { message: String },

    /// A single line or record could not be decoded
    #[error("Record decode error at line {line}: {message}")]
    RecordDecode { line: usize, message: String },

    /// A decoded record failed range validation
    #[error("Validation error: {}", .issues.join("; "))]
    Validation { issues: Vec<String> },

    /// Timestamp could not be normalized
    #[error("Timestamp error: {message}")]
    Timestamp { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON encoding or decoding failed outside the per-line path
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a binary format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a record decode error for the given line number
    pub fn record_decode(line: usize, message: impl Into<String>) -> Self {
        Self::RecordDecode {
            line,
            message: message.into(),
        }
    }

    /// Create a validation error from the collected issues
    pub fn validation(issues: Vec<String>) -> Self {
        Self::Validation { issues }
    }

    /// Create a timestamp error
    pub fn timestamp(message: impl Into<String>) -> Self {
        Self::Timestamp {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Whether this error aborts a parse call rather than skipping one record
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Format { .. }
                | Self::Configuration { .. }
                | Self::Serialization { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

