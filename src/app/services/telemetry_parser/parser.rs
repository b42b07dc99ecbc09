//! Core telemetry parser implementation
//!
//! Selects a decoder by input format and drives decode → validate → emit,
//! accumulating statistics as it goes. Bulk and streaming modes share one
//! decode loop and differ only in what happens to an accepted record.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::stats::{ParseResult, ParseStatistics};
use crate::app::models::TelemetryRecord;
use crate::app::services::format_decoders::delimited::decode_fields;
use crate::app::services::format_decoders::{ColumnMapping, DecodeEvent, FormatDecoder};
use crate::config::{InputFormat, ParserConfig};
use crate::constants::ESTIMATED_BYTES_PER_RECORD;
use crate::{Error, Result};

/// Multi-format telemetry parser
///
/// The configuration is fixed at construction. Each parse call starts fresh
/// statistics; the snapshot of the most recent call stays readable through
/// [`statistics`](Self::statistics), including the partial counts of a call
/// that failed on a source error.
#[derive(Debug, Clone, Default)]
pub struct TelemetryParser {
    config: ParserConfig,
    stats: ParseStatistics,
}

/// Timing summary of repeated parses of one file
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BenchmarkReport {
    pub iterations: usize,
    /// Records accepted per iteration
    pub records: usize,
    /// Per-iteration parse time in milliseconds
    pub iteration_times_ms: Vec<f64>,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub records_per_second: f64,
}

impl TelemetryParser {
    /// Create a parser, rejecting an inconsistent configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: ParseStatistics::new(),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Statistics of the most recent parse call
    pub fn statistics(&self) -> &ParseStatistics {
        &self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats = ParseStatistics::new();
    }

    /// Parse a whole source and collect the accepted records
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the source cannot be read and [`Error::Format`] if a
    /// binary header is invalid. Line-level problems are counted, not returned.
    pub fn parse<R: Read>(&mut self, source: R, format: InputFormat) -> Result<ParseResult> {
        let mut records = Vec::new();
        self.drive(BufReader::new(source), format, |record| records.push(record))?;
        Ok(ParseResult {
            records,
            stats: self.stats.clone(),
        })
    }

    /// Parse a source, handing each accepted record to `on_record` in order
    pub fn parse_streaming<R, F>(
        &mut self,
        source: R,
        format: InputFormat,
        on_record: F,
    ) -> Result<ParseStatistics>
    where
        R: Read,
        F: FnMut(TelemetryRecord),
    {
        self.drive(BufReader::new(source), format, on_record)?;
        Ok(self.stats.clone())
    }

    /// Parse a source, handing accepted records over in chunks of `batch_size`
    ///
    /// The final chunk may be shorter; an empty source produces no chunk.
    pub fn parse_in_batches<R, F>(
        &mut self,
        source: R,
        format: InputFormat,
        mut on_batch: F,
    ) -> Result<ParseStatistics>
    where
        R: Read,
        F: FnMut(Vec<TelemetryRecord>),
    {
        let batch_size = self.config.batch_size;
        let mut batch = Vec::with_capacity(batch_size);

        self.drive(BufReader::new(source), format, |record| {
            batch.push(record);
            if batch.len() >= batch_size {
                on_batch(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)));
            }
        })?;

        if !batch.is_empty() {
            on_batch(batch);
        }
        Ok(self.stats.clone())
    }

    /// Open a file and parse it in bulk
    pub fn parse_file(&mut self, path: &Path, format: InputFormat) -> Result<ParseResult> {
        let file = open_source(path)?;
        let estimate = file
            .metadata()
            .map(|m| m.len() as usize / ESTIMATED_BYTES_PER_RECORD)
            .unwrap_or(0);

        let mut records = Vec::with_capacity(estimate);
        self.drive(BufReader::new(file), format, |record| records.push(record))?;
        Ok(ParseResult {
            records,
            stats: self.stats.clone(),
        })
    }

    /// Open a file and stream its accepted records to `on_record`
    pub fn parse_file_streaming<F>(
        &mut self,
        path: &Path,
        format: InputFormat,
        on_record: F,
    ) -> Result<ParseStatistics>
    where
        F: FnMut(TelemetryRecord),
    {
        let file = open_source(path)?;
        self.parse_streaming(file, format, on_record)
    }

    /// Decode a single delimited-text line with the positional column layout
    ///
    /// Returns `None` for a blank or structurally invalid line, and for a
    /// record the configured policy would reject.
    pub fn parse_line(&self, line: &str) -> Option<TelemetryRecord> {
        let line = line.trim_end_matches(['\r', '\n', ' ']);
        if line.is_empty() {
            return None;
        }

        let record = decode_fields(line, self.config.delimiter, &ColumnMapping::positional()).ok()?;
        self.rejection_reason(&record).is_none().then_some(record)
    }

    /// Parse a file repeatedly and summarize the timings
    pub fn benchmark(
        &mut self,
        path: &Path,
        format: InputFormat,
        iterations: usize,
    ) -> Result<BenchmarkReport> {
        if iterations == 0 {
            return Err(Error::configuration(
                "Benchmark requires at least one iteration",
            ));
        }

        let mut iteration_times_ms = Vec::with_capacity(iterations);
        let mut records = 0;
        for iteration in 1..=iterations {
            let result = self.parse_file(path, format)?;
            debug!(
                "Benchmark iteration {}: {:.2} ms",
                iteration, result.stats.parse_time_ms
            );
            iteration_times_ms.push(result.stats.parse_time_ms);
            records = result.len();
        }

        let total: f64 = iteration_times_ms.iter().sum();
        let average_ms = total / iterations as f64;
        let min_ms = iteration_times_ms.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = iteration_times_ms.iter().copied().fold(0.0, f64::max);
        let records_per_second = if average_ms > 0.0 {
            records as f64 / (average_ms / 1000.0)
        } else {
            0.0
        };

        Ok(BenchmarkReport {
            iterations,
            records,
            iteration_times_ms,
            average_ms,
            min_ms,
            max_ms,
            records_per_second,
        })
    }

    /// Run one parse call: fresh statistics, decode loop, finalized timing
    fn drive<R, F>(&mut self, source: R, format: InputFormat, mut emit: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(TelemetryRecord),
    {
        let start = Instant::now();
        self.stats = ParseStatistics::new();
        info!("Parsing {} input", format);

        let outcome = self.decode_all(source, format, &mut emit);
        self.stats.finalize(start.elapsed());

        match &outcome {
            Ok(()) => info!(
                "Parsed {} records ({} rejected) from {} lines in {:.2} ms",
                self.stats.valid_records,
                self.stats.invalid_records,
                self.stats.total_lines,
                self.stats.parse_time_ms
            ),
            Err(e) => warn!(
                "Parse aborted after {} records: {}",
                self.stats.valid_records, e
            ),
        }
        outcome
    }

    fn decode_all<R, F>(&mut self, source: R, format: InputFormat, emit: &mut F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(TelemetryRecord),
    {
        let mut decoder = FormatDecoder::new(source, format, &self.config)?;

        let outcome = loop {
            match decoder.next_event() {
                Ok(Some(event)) => self.handle_event(event, emit),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.stats.total_lines = decoder.lines_read();
        self.stats.bytes_processed = decoder.bytes_read();
        outcome
    }

    fn handle_event<F>(&mut self, event: DecodeEvent, emit: &mut F)
    where
        F: FnMut(TelemetryRecord),
    {
        match event {
            DecodeEvent::Skipped => {}
            DecodeEvent::Rejected { line, reason } => {
                debug!("Rejected line {}: {}", line, reason);
                self.stats.record_rejection(line, &reason);
            }
            DecodeEvent::Record { line, record } => {
                if let Some(reason) = self.rejection_reason(&record) {
                    debug!("Rejected line {}: {}", line, reason);
                    self.stats.record_rejection(line, &reason);
                    return;
                }
                if !record.has_timestamp() {
                    self.stats.unparsed_timestamps += 1;
                }
                self.stats.valid_records += 1;
                emit(record);
            }
        }
    }

    /// Reason the configured policy rejects a decoded record, if any
    fn rejection_reason(&self, record: &TelemetryRecord) -> Option<String> {
        if self.config.validate {
            let issues = record.validation_issues();
            if !issues.is_empty() {
                return Some(Error::validation(issues).to_string());
            }
        }
        if self.config.strict_timestamps && !record.has_timestamp() {
            return Some(Error::timestamp("timestamp could not be parsed").to_string());
        }
        None
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))
}
