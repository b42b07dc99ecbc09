//! Per-format telemetry decoders
//!
//! Every input format has a pull-based decoder that yields one
//! [`DecodeEvent`] at a time. Decoders turn raw bytes into records and report
//! structural failures per line; range validation and statistics belong to the
//! parser driving them.
//!
//! ## Architecture
//!
//! - [`delimited`] - Delimited text with optional header row
//! - [`log_line`] - Pipe-delimited log lines
//! - [`json`] - JSON arrays and newline-delimited objects
//! - [`binary`] - Adapter over the binary codec reader
//! - [`column_mapping`] - Header-driven field positions
//! - [`field_parsers`] - Minimal decimal and integer parsing
//! - [`line_reader`] - Reused-buffer line reading shared by the text decoders

pub mod binary;
pub mod column_mapping;
pub mod delimited;
pub mod field_parsers;
pub mod json;
pub mod line_reader;
pub mod log_line;

#[cfg(test)]
pub mod tests;

use std::io::BufRead;

pub use binary::BinaryDecoder;
pub use column_mapping::{ColumnMapping, TelemetryField};
pub use delimited::DelimitedDecoder;
pub use json::JsonDecoder;
pub use log_line::LogLineDecoder;

use crate::Result;
use crate::app::models::TelemetryRecord;
use crate::config::{InputFormat, ParserConfig};

/// Outcome of decoding one line (or one binary record)
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent {
    /// A structurally complete record, not yet validated
    Record { line: usize, record: TelemetryRecord },

    /// The line could not be decoded; it is counted and dropped
    Rejected { line: usize, reason: String },

    /// Blank line, comment, header row or bracket artifact
    Skipped,
}

impl DecodeEvent {
    pub fn rejected(line: usize, reason: impl Into<String>) -> Self {
        Self::Rejected {
            line,
            reason: reason.into(),
        }
    }
}

/// Decoder selected by input format
#[derive(Debug)]
pub enum FormatDecoder<R> {
    Delimited(DelimitedDecoder<R>),
    LogLine(LogLineDecoder<R>),
    Json(JsonDecoder<R>),
    Binary(BinaryDecoder<R>),
}

impl<R: BufRead> FormatDecoder<R> {
    /// Build the decoder for `format`
    ///
    /// Binary sources validate their header here, so a bad magic or version
    /// fails before any record is produced.
    pub fn new(reader: R, format: InputFormat, config: &ParserConfig) -> Result<Self> {
        Ok(match format {
            InputFormat::Csv => {
                Self::Delimited(DelimitedDecoder::new(reader, config.delimiter, config.has_header))
            }
            InputFormat::Log => Self::LogLine(LogLineDecoder::new(reader)),
            InputFormat::Json => Self::Json(JsonDecoder::new(reader)?),
            InputFormat::Binary => Self::Binary(BinaryDecoder::new(reader)?),
        })
    }

    /// Pull the next event, or `None` when the source is exhausted
    ///
    /// Only source-level failures are returned as errors.
    pub fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        match self {
            Self::Delimited(decoder) => decoder.next_event(),
            Self::LogLine(decoder) => decoder.next_event(),
            Self::Json(decoder) => decoder.next_event(),
            Self::Binary(decoder) => decoder.next_event(),
        }
    }

    /// Lines (or binary records) consumed so far
    pub fn lines_read(&self) -> usize {
        match self {
            Self::Delimited(decoder) => decoder.lines_read(),
            Self::LogLine(decoder) => decoder.lines_read(),
            Self::Json(decoder) => decoder.lines_read(),
            Self::Binary(decoder) => decoder.lines_read(),
        }
    }

    /// Bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        match self {
            Self::Delimited(decoder) => decoder.bytes_read(),
            Self::LogLine(decoder) => decoder.bytes_read(),
            Self::Json(decoder) => decoder.bytes_read(),
            Self::Binary(decoder) => decoder.bytes_read(),
        }
    }
}

impl<R: BufRead> Iterator for FormatDecoder<R> {
    type Item = Result<DecodeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}
