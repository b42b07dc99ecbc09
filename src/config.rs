//! Configuration management and validation.
//!
//! Provides the parser configuration, the closed set of supported input
//! formats and the loading/validation rules applied before a parser is built.

use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_DELIMITER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Supported telemetry input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Delimited text with an optional header row
    Csv,
    /// Pipe-delimited log lines: `timestamp|vehicle_id|lat,lon|speed|rpm|fuel|odo|temp|batt|diag`
    Log,
    /// JSON array of record objects, or one object per line
    Json,
    /// Compact length-prefixed binary format
    Binary,
}

impl InputFormat {
    /// All supported formats in presentation order
    pub const ALL: [InputFormat; 4] = [Self::Csv, Self::Log, Self::Json, Self::Binary];

    /// Canonical lowercase name of the format
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Log => "log",
            Self::Json => "json",
            Self::Binary => "binary",
        }
    }

    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Csv),
            "log" => Some(Self::Log),
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            "fbin" | "bin" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Field delimiter implied by a file extension (`.tsv` is tab-separated)
    pub fn implied_delimiter(path: &Path) -> Option<char> {
        let extension = path.extension()?.to_str()?;
        extension.eq_ignore_ascii_case("tsv").then_some('\t')
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "delimited" => Ok(Self::Csv),
            "log" => Ok(Self::Log),
            "json" | "ndjson" => Ok(Self::Json),
            "binary" | "bin" | "fbin" => Ok(Self::Binary),
            other => Err(Error::configuration(format!(
                "Unsupported format '{}'. Available formats: {}",
                other,
                Self::ALL.map(|f| f.name()).join(", ")
            ))),
        }
    }
}

/// Parser configuration
///
/// Supplied at parser construction and immutable for that parser's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Enforce field-range checks, rejecting records that fail them
    pub validate: bool,

    /// First line of delimited text is a column-name header
    pub has_header: bool,

    /// Field separator for delimited text
    pub delimiter: char,

    /// Advisory chunking hint for downstream consumers
    pub batch_size: usize,

    /// Reject records whose timestamp could not be normalized
    pub strict_timestamps: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate: true,
            has_header: true,
            delimiter: DEFAULT_DELIMITER,
            batch_size: DEFAULT_BATCH_SIZE,
            strict_timestamps: false,
        }
    }
}

impl ParserConfig {
    /// Enable or disable range validation
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Declare whether delimited input starts with a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the delimited-text field separator
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the advisory batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Reject records carrying the sentinel timestamp
    pub fn with_strict_timestamps(mut self, strict: bool) -> Self {
        self.strict_timestamps = strict;
        self
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(Error::configuration(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }

        if matches!(self.delimiter, '\n' | '\r' | '"') {
            return Err(Error::configuration(format!(
                "Delimiter {:?} cannot be used as a field separator",
                self.delimiter
            )));
        }

        if self.batch_size == 0 {
            return Err(Error::configuration(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing keys take their default values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;

        let config: ParserConfig = serde_json::from_str(&content).map_err(|e| {
            Error::serialization(
                format!("Failed to parse config file {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        debug!("Loaded parser configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
