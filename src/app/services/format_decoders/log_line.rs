//! Pipe-delimited log line decoder
//!
//! Line layout: `timestamp|vehicle_id|lat,lon|speed|rpm|fuel|odo|temp|batt|diag`.
//! Unlike the delimited-text decoder, numeric fields are parsed strictly and a
//! malformed value rejects the whole line. Decimals accept the full standard
//! float syntax, exponents included, but must be finite. Log lines carry no
//! heading.

use std::io::BufRead;

use super::DecodeEvent;
use super::field_parsers::parse_integer;
use super::line_reader::LineReader;
use crate::Result;
use crate::app::models::TelemetryRecord;
use crate::app::services::timestamp_normalizer;
use crate::constants::{
    LOG_COMMENT_PREFIX, LOG_COORDINATE_SEPARATOR, LOG_FIELD_SEPARATOR, MIN_LOG_FIELDS,
};

/// Pull-based decoder for pipe-delimited log lines
#[derive(Debug)]
pub struct LogLineDecoder<R> {
    lines: LineReader<R>,
}

impl<R: BufRead> LogLineDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }

    /// Decode the next line
    pub fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        let Some(line) = self.lines.next_line()? else {
            return Ok(None);
        };
        let number = line.number;

        let text = match line.text {
            Ok(text) => text.trim(),
            Err(e) => return Ok(Some(DecodeEvent::rejected(number, format!("invalid UTF-8: {}", e)))),
        };

        if text.is_empty() || text.starts_with(LOG_COMMENT_PREFIX) {
            return Ok(Some(DecodeEvent::Skipped));
        }

        Ok(Some(match decode_log_line(text) {
            Ok(record) => DecodeEvent::Record { line: number, record },
            Err(reason) => DecodeEvent::rejected(number, reason),
        }))
    }

    pub fn lines_read(&self) -> usize {
        self.lines.lines_read()
    }

    pub fn bytes_read(&self) -> u64 {
        self.lines.bytes_read()
    }
}

/// Decode one trimmed, non-comment log line
pub fn decode_log_line(line: &str) -> std::result::Result<TelemetryRecord, String> {
    let parts: Vec<&str> = line.split(LOG_FIELD_SEPARATOR).collect();
    if parts.len() < MIN_LOG_FIELDS {
        return Err(format!(
            "expected at least {} '{}'-separated fields, found {}",
            MIN_LOG_FIELDS,
            LOG_FIELD_SEPARATOR,
            parts.len()
        ));
    }

    let (latitude, longitude) = parts[2]
        .split_once(LOG_COORDINATE_SEPARATOR)
        .ok_or_else(|| format!("coordinate pair '{}' is missing a comma", parts[2]))?;

    let decimal = |name: &str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("{} '{}' is not a number", name, value))
    };

    Ok(TelemetryRecord {
        vehicle_id: parts[1].trim().to_string(),
        timestamp: timestamp_normalizer::normalize_or_sentinel(parts[0]),
        latitude: decimal("latitude", latitude)?,
        longitude: decimal("longitude", longitude)?,
        speed: decimal("speed", parts[3])?,
        heading: 0.0,
        engine_rpm: parse_integer(parts[4])
            .ok_or_else(|| format!("engine_rpm '{}' is not an integer", parts[4]))?,
        fuel_level: decimal("fuel_level", parts[5])?,
        odometer_km: decimal("odometer_km", parts[6])?,
        engine_temp: decimal("engine_temp", parts[7])?,
        battery_volt: decimal("battery_volt", parts[8])?,
        diagnostic_code: parts[9].trim().to_string(),
    })
}
