//! JSON decoder for array payloads and newline-delimited objects
//!
//! A payload whose first non-whitespace byte is `[` is buffered and decoded as
//! one array of record objects. If that fails (for example a hand-edited file
//! with one object per line and stray brackets), the same buffered bytes are
//! replayed line by line. Any other payload is streamed line by line directly.

use serde::Deserialize;
use std::io::{BufRead, Chain, Cursor, Read};
use tracing::debug;

use super::DecodeEvent;
use super::line_reader::LineReader;
use crate::app::models::TelemetryRecord;
use crate::app::services::timestamp_normalizer;
use crate::constants::TIMESTAMP_SENTINEL;
use crate::{Error, Result};

/// Wire shape of one JSON record; absent fields take zero/empty defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonRecord {
    vehicle_id: String,
    timestamp: JsonTimestamp,
    latitude: f64,
    longitude: f64,
    speed: f64,
    heading: f64,
    engine_rpm: i32,
    fuel_level: f64,
    odometer_km: f64,
    engine_temp: f64,
    battery_volt: f64,
    diagnostic_code: Option<String>,
}

/// Timestamps arrive as epoch numbers or as text
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum JsonTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

impl JsonTimestamp {
    fn to_epoch_millis(&self) -> i64 {
        match self {
            // Numbers follow the same seconds/milliseconds digit rule as text
            Self::Integer(value) if *value > 0 => {
                timestamp_normalizer::normalize_or_sentinel(&value.to_string())
            }
            Self::Float(value) if value.is_finite() && *value >= 1.0 => {
                timestamp_normalizer::normalize_or_sentinel(&(value.trunc() as i64).to_string())
            }
            Self::Text(text) => timestamp_normalizer::normalize_or_sentinel(text),
            _ => TIMESTAMP_SENTINEL,
        }
    }
}

impl From<JsonRecord> for TelemetryRecord {
    fn from(raw: JsonRecord) -> Self {
        Self {
            timestamp: raw.timestamp.to_epoch_millis(),
            vehicle_id: raw.vehicle_id,
            latitude: raw.latitude,
            longitude: raw.longitude,
            speed: raw.speed,
            heading: raw.heading,
            engine_rpm: raw.engine_rpm,
            fuel_level: raw.fuel_level,
            odometer_km: raw.odometer_km,
            engine_temp: raw.engine_temp,
            battery_volt: raw.battery_volt,
            diagnostic_code: raw.diagnostic_code.unwrap_or_default(),
        }
    }
}

type ReplayReader<R> = Chain<Cursor<Vec<u8>>, R>;

#[derive(Debug)]
enum Mode<R> {
    Array {
        elements: std::vec::IntoIter<serde_json::Value>,
        position: usize,
        bytes: u64,
    },
    Lines(LineReader<ReplayReader<R>>),
}

/// Pull-based decoder for JSON telemetry
#[derive(Debug)]
pub struct JsonDecoder<R> {
    mode: Mode<R>,
}

impl<R: BufRead> JsonDecoder<R> {
    /// Inspect the start of the payload and choose array or line mode
    pub fn new(mut reader: R) -> Result<Self> {
        let mut prefix = Vec::new();
        let first = skip_whitespace(&mut reader, &mut prefix)?;

        if first != Some(b'[') {
            return Ok(Self {
                mode: Mode::Lines(LineReader::new(Cursor::new(prefix).chain(reader))),
            });
        }

        reader
            .read_to_end(&mut prefix)
            .map_err(|e| Error::io("Failed to read JSON payload", e))?;

        match serde_json::from_slice::<Vec<serde_json::Value>>(&prefix) {
            Ok(elements) => {
                debug!("Decoding JSON array with {} elements", elements.len());
                Ok(Self {
                    mode: Mode::Array {
                        elements: elements.into_iter(),
                        position: 0,
                        bytes: prefix.len() as u64,
                    },
                })
            }
            Err(e) => {
                debug!("JSON array decoding failed ({}), falling back to line mode", e);
                Ok(Self {
                    mode: Mode::Lines(LineReader::new(Cursor::new(prefix).chain(reader))),
                })
            }
        }
    }

    /// Decode the next array element or line
    pub fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        match &mut self.mode {
            Mode::Array {
                elements, position, ..
            } => {
                let Some(value) = elements.next() else {
                    return Ok(None);
                };
                *position += 1;
                Ok(Some(match serde_json::from_value::<JsonRecord>(value) {
                    Ok(raw) => DecodeEvent::Record {
                        line: *position,
                        record: raw.into(),
                    },
                    Err(e) => DecodeEvent::rejected(*position, format!("array element: {}", e)),
                }))
            }
            Mode::Lines(lines) => {
                let Some(line) = lines.next_line()? else {
                    return Ok(None);
                };
                let number = line.number;
                let text = match line.text {
                    Ok(text) => text,
                    Err(e) => {
                        return Ok(Some(DecodeEvent::rejected(number, format!("invalid UTF-8: {}", e))));
                    }
                };
                Ok(Some(decode_json_line(number, text)))
            }
        }
    }

    /// Elements decoded in array mode, physical lines in line mode
    pub fn lines_read(&self) -> usize {
        match &self.mode {
            Mode::Array { position, .. } => *position,
            Mode::Lines(lines) => lines.lines_read(),
        }
    }

    pub fn bytes_read(&self) -> u64 {
        match &self.mode {
            Mode::Array { bytes, .. } => *bytes,
            Mode::Lines(lines) => lines.bytes_read(),
        }
    }
}

/// Decode one line of newline-delimited JSON
///
/// Blank lines and lone array brackets are skipped; a trailing comma is
/// tolerated.
pub fn decode_json_line(number: usize, line: &str) -> DecodeEvent {
    let line = line.trim();
    if line.is_empty() || line == "[" || line == "]" {
        return DecodeEvent::Skipped;
    }
    let line = line.strip_suffix(',').unwrap_or(line);

    match serde_json::from_str::<JsonRecord>(line) {
        Ok(raw) => DecodeEvent::Record {
            line: number,
            record: raw.into(),
        },
        Err(e) => DecodeEvent::rejected(number, e.to_string()),
    }
}

/// Consume leading whitespace into `prefix` and peek the first significant byte
fn skip_whitespace<R: BufRead>(reader: &mut R, prefix: &mut Vec<u8>) -> Result<Option<u8>> {
    loop {
        let buffer = reader
            .fill_buf()
            .map_err(|e| Error::io("Failed to read JSON payload", e))?;
        if buffer.is_empty() {
            return Ok(None);
        }

        let whitespace = buffer
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        let first = buffer.get(whitespace).copied();
        prefix.extend_from_slice(&buffer[..whitespace]);
        reader.consume(whitespace);

        if first.is_some() {
            return Ok(first);
        }
    }
}
