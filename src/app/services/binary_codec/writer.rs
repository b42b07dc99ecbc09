//! Binary stream encoder

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use super::format::BinaryHeader;
use crate::app::models::TelemetryRecord;
use crate::constants::{BINARY_FIXED_FIELDS_SIZE, BINARY_HEADER_SIZE, MAX_BINARY_STRING_LEN};
use crate::{Error, Result};

/// Encoder writing the header once, then one record per `write` call
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    writer: W,
    records_written: usize,
}

impl BinaryWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write the header to it
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            Error::io(format!("Failed to create binary file {}", path.display()), e)
        })?;
        debug!("Writing binary telemetry to {}", path.display());
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> BinaryWriter<W> {
    /// Wrap a sink and write the header immediately
    pub fn new(mut writer: W) -> Result<Self> {
        BinaryHeader::new()
            .write_to(&mut writer)
            .map_err(|e| Error::io("Failed to write binary header", e))?;
        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Encode one record
    pub fn write(&mut self, record: &TelemetryRecord) -> Result<()> {
        encode_record(&mut self.writer, record)
            .map_err(|e| Error::io("Failed to write binary record", e))?;
        self.records_written += 1;
        Ok(())
    }

    /// Encode records in order
    pub fn write_batch(&mut self, records: &[TelemetryRecord]) -> Result<()> {
        records.iter().try_for_each(|record| self.write(record))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush binary output", e))
    }

    /// Records encoded so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and return the underlying sink
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// Encode a header followed by every record into an in-memory buffer
pub fn encode_records(records: &[TelemetryRecord]) -> Result<Vec<u8>> {
    let capacity = BINARY_HEADER_SIZE + records.len() * (BINARY_FIXED_FIELDS_SIZE + 16);
    let mut writer = BinaryWriter::new(Vec::with_capacity(capacity))?;
    writer.write_batch(records)?;
    writer.into_inner()
}

/// Longest prefix of `value` that fits a length byte and ends on a char boundary
pub fn truncate_utf8(value: &str) -> &str {
    if value.len() <= MAX_BINARY_STRING_LEN {
        return value;
    }
    let mut end = MAX_BINARY_STRING_LEN;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn encode_record<W: Write>(writer: &mut W, record: &TelemetryRecord) -> io::Result<()> {
    write_string(writer, &record.vehicle_id)?;
    writer.write_i64::<LittleEndian>(record.timestamp)?;
    writer.write_f64::<LittleEndian>(record.latitude)?;
    writer.write_f64::<LittleEndian>(record.longitude)?;
    writer.write_f64::<LittleEndian>(record.speed)?;
    writer.write_f64::<LittleEndian>(record.heading)?;
    writer.write_i32::<LittleEndian>(record.engine_rpm)?;
    writer.write_f64::<LittleEndian>(record.fuel_level)?;
    writer.write_f64::<LittleEndian>(record.odometer_km)?;
    writer.write_f64::<LittleEndian>(record.engine_temp)?;
    writer.write_f64::<LittleEndian>(record.battery_volt)?;
    write_string(writer, &record.diagnostic_code)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let bytes = truncate_utf8(value).as_bytes();
    // truncate_utf8 guarantees the length fits in a u8
    writer.write_u8(bytes.len() as u8)?;
    writer.write_all(bytes)
}
