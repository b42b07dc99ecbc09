//! Parse statistics and result structures
//!
//! Statistics are created fresh for every parse call, threaded through the
//! decode loop and finalized once when the call ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::app::models::TelemetryRecord;
use crate::constants::{MAX_DIAGNOSTICS, SUCCESS_RATE_THRESHOLD};

/// Parsing result with accepted records and statistics
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Accepted records in source order
    pub records: Vec<TelemetryRecord>,

    /// Statistics of the call that produced the records
    pub stats: ParseStatistics,
}

impl ParseResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Counters and throughput for one parse call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStatistics {
    /// Physical lines read (records for binary, elements for JSON arrays)
    pub total_lines: usize,

    /// Records accepted and emitted
    pub valid_records: usize,

    /// Lines or records rejected for any reason
    pub invalid_records: usize,

    /// Accepted records that carry the sentinel timestamp
    pub unparsed_timestamps: usize,

    /// Bytes consumed from the source
    pub bytes_processed: u64,

    /// Wall-clock duration of the call in milliseconds
    pub parse_time_ms: f64,

    /// Accepted records per second (0 when no time elapsed)
    pub records_per_second: f64,

    /// First rejection reasons, bounded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ParseStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a rejected line and keep its reason while there is room
    pub fn record_rejection(&mut self, line: usize, reason: &str) {
        self.invalid_records += 1;
        if self.diagnostics.len() < MAX_DIAGNOSTICS {
            self.diagnostics.push(format!("line {}: {}", line, reason));
        }
    }

    /// Set timing and derived throughput from the elapsed wall-clock time
    pub fn finalize(&mut self, elapsed: Duration) {
        self.parse_time_ms = elapsed.as_secs_f64() * 1000.0;
        self.records_per_second = if self.parse_time_ms > 0.0 {
            self.valid_records as f64 / (self.parse_time_ms / 1000.0)
        } else {
            0.0
        };
    }

    /// Records examined (accepted plus rejected)
    pub fn records_examined(&self) -> usize {
        self.valid_records + self.invalid_records
    }

    /// Calculate success rate as a percentage of records examined
    pub fn success_rate(&self) -> f64 {
        let examined = self.records_examined();
        if examined == 0 {
            0.0
        } else {
            (self.valid_records as f64 / examined as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > SUCCESS_RATE_THRESHOLD
    }

    /// Throughput in megabytes per second
    pub fn megabytes_per_second(&self) -> f64 {
        if self.parse_time_ms > 0.0 {
            (self.bytes_processed as f64 / (1024.0 * 1024.0)) / (self.parse_time_ms / 1000.0)
        } else {
            0.0
        }
    }
}

impl fmt::Display for ParseStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parse Statistics:")?;
        writeln!(f, "  Total lines:      {}", self.total_lines)?;
        writeln!(f, "  Valid records:    {}", self.valid_records)?;
        writeln!(f, "  Invalid records:  {}", self.invalid_records)?;
        writeln!(f, "  Bad timestamps:   {}", self.unparsed_timestamps)?;
        writeln!(f, "  Bytes processed:  {}", self.bytes_processed)?;
        writeln!(f, "  Parse time:       {:.2} ms", self.parse_time_ms)?;
        writeln!(f, "  Records/second:   {:.0}", self.records_per_second)?;
        write!(f, "  Throughput:       {:.2} MB/s", self.megabytes_per_second())
    }
}
