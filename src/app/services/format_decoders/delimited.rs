//! Delimited-text decoder
//!
//! Splits each line on the configured delimiter into slices of the shared
//! line buffer and maps them onto record fields through a [`ColumnMapping`].
//! Numeric fields are coerced leniently: malformed text becomes zero.

use std::io::BufRead;
use tracing::debug;

use super::DecodeEvent;
use super::column_mapping::{ColumnMapping, TelemetryField};
use super::field_parsers::{fast_f64, fast_i32};
use super::line_reader::LineReader;
use crate::Result;
use crate::app::models::TelemetryRecord;
use crate::app::services::timestamp_normalizer;
use crate::constants::MIN_DELIMITED_FIELDS;

/// Pull-based decoder for delimited telemetry text
#[derive(Debug)]
pub struct DelimitedDecoder<R> {
    lines: LineReader<R>,
    delimiter: char,
    mapping: ColumnMapping,
    awaiting_header: bool,
}

impl<R: BufRead> DelimitedDecoder<R> {
    /// Create a decoder; with `has_header` the first non-empty line is the header
    pub fn new(reader: R, delimiter: char, has_header: bool) -> Self {
        Self {
            lines: LineReader::new(reader),
            delimiter,
            mapping: ColumnMapping::positional(),
            awaiting_header: has_header,
        }
    }

    /// Decode the next line
    pub fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        let Some(line) = self.lines.next_line()? else {
            return Ok(None);
        };
        let number = line.number;

        let text = match line.text {
            Ok(text) => text.trim_end_matches(['\r', '\n', ' ']),
            Err(e) => return Ok(Some(DecodeEvent::rejected(number, format!("invalid UTF-8: {}", e)))),
        };

        if text.is_empty() {
            return Ok(Some(DecodeEvent::Skipped));
        }

        if self.awaiting_header {
            self.awaiting_header = false;
            self.mapping = ColumnMapping::from_header(text.split(self.delimiter));
            debug!(
                "Header on line {} matched {} canonical columns",
                number,
                self.mapping.recognized_columns()
            );
            return Ok(Some(DecodeEvent::Skipped));
        }

        Ok(Some(match decode_fields(text, self.delimiter, &self.mapping) {
            Ok(record) => DecodeEvent::Record { line: number, record },
            Err(reason) => DecodeEvent::rejected(number, reason),
        }))
    }

    /// Column mapping currently in effect
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn lines_read(&self) -> usize {
        self.lines.lines_read()
    }

    pub fn bytes_read(&self) -> u64 {
        self.lines.bytes_read()
    }
}

/// Decode one already-trimmed line into a record
///
/// Fails only on structure (too few fields); numeric fields never fail.
pub fn decode_fields(
    line: &str,
    delimiter: char,
    mapping: &ColumnMapping,
) -> std::result::Result<TelemetryRecord, String> {
    let fields: Vec<&str> = line.split(delimiter).collect();
    if fields.len() < MIN_DELIMITED_FIELDS {
        return Err(format!(
            "expected at least {} fields, found {}",
            MIN_DELIMITED_FIELDS,
            fields.len()
        ));
    }

    let text = |field| mapping.get(&fields, field).unwrap_or("");
    let float = |field| fast_f64(text(field));

    Ok(TelemetryRecord {
        vehicle_id: text(TelemetryField::VehicleId).to_string(),
        timestamp: timestamp_normalizer::normalize_or_sentinel(text(TelemetryField::Timestamp)),
        latitude: float(TelemetryField::Latitude),
        longitude: float(TelemetryField::Longitude),
        speed: float(TelemetryField::Speed),
        heading: float(TelemetryField::Heading),
        engine_rpm: fast_i32(text(TelemetryField::EngineRpm)),
        fuel_level: float(TelemetryField::FuelLevel),
        odometer_km: float(TelemetryField::OdometerKm),
        engine_temp: float(TelemetryField::EngineTemp),
        battery_volt: float(TelemetryField::BatteryVolt),
        diagnostic_code: mapping
            .get(&fields, TelemetryField::DiagnosticCode)
            .map(str::to_string)
            .unwrap_or_default(),
    })
}
