//! Binary stream decoder

use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::format::BinaryHeader;
use crate::app::models::TelemetryRecord;
use crate::{Error, Result};

/// Byte-counting wrapper so the reader can report `bytes_processed`
#[derive(Debug)]
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.count += read as u64;
        Ok(read)
    }
}

/// Decoder yielding one record per `next_record` call
///
/// Record-level problems come back as [`Error::RecordDecode`] and leave the
/// reader usable: a string that is not UTF-8 rejects only that record, while a
/// truncated record is reported once and ends the stream.
#[derive(Debug)]
pub struct BinaryReader<R> {
    reader: CountingReader<R>,
    records_seen: usize,
    finished: bool,
}

impl BinaryReader<BufReader<File>> {
    /// Open a binary telemetry file and validate its header
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::io(format!("Failed to open binary file {}", path.display()), e)
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> BinaryReader<R> {
    /// Wrap a source and validate the header
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = CountingReader {
            inner: reader,
            count: 0,
        };
        BinaryHeader::read_from(&mut reader)?;
        Ok(Self {
            reader,
            records_seen: 0,
            finished: false,
        })
    }

    /// Decode the next record, or `None` at a clean end of stream
    pub fn next_record(&mut self) -> Result<Option<TelemetryRecord>> {
        if self.finished {
            return Ok(None);
        }

        let vid_len = match self.reader.read_u8() {
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.finished = true;
                return Ok(None);
            }
            Err(e) => return Err(Error::io("Failed to read binary record", e)),
        };
        self.records_seen += 1;

        match self.read_body(vid_len) {
            Ok(fields) => fields.into_record(self.records_seen).map(Some),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.finished = true;
                Err(Error::record_decode(
                    self.records_seen,
                    "record truncated at end of stream",
                ))
            }
            Err(e) => Err(Error::io("Failed to read binary record", e)),
        }
    }

    /// Records started so far, including rejected and truncated ones
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Bytes consumed so far, header included
    pub fn bytes_read(&self) -> u64 {
        self.reader.count
    }

    fn read_body(&mut self, vid_len: u8) -> io::Result<RawRecord> {
        let r = &mut self.reader;
        let vehicle_id = read_bytes(r, vid_len)?;
        let timestamp = r.read_i64::<LittleEndian>()?;
        let latitude = r.read_f64::<LittleEndian>()?;
        let longitude = r.read_f64::<LittleEndian>()?;
        let speed = r.read_f64::<LittleEndian>()?;
        let heading = r.read_f64::<LittleEndian>()?;
        let engine_rpm = r.read_i32::<LittleEndian>()?;
        let fuel_level = r.read_f64::<LittleEndian>()?;
        let odometer_km = r.read_f64::<LittleEndian>()?;
        let engine_temp = r.read_f64::<LittleEndian>()?;
        let battery_volt = r.read_f64::<LittleEndian>()?;
        let diag_len = r.read_u8()?;
        let diagnostic_code = read_bytes(r, diag_len)?;

        Ok(RawRecord {
            vehicle_id,
            diagnostic_code,
            record: TelemetryRecord {
                vehicle_id: String::new(),
                timestamp,
                latitude,
                longitude,
                speed,
                heading,
                engine_rpm,
                fuel_level,
                odometer_km,
                engine_temp,
                battery_volt,
                diagnostic_code: String::new(),
            },
        })
    }
}

impl<R: Read> Iterator for BinaryReader<R> {
    type Item = Result<TelemetryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Decode every record of an in-memory stream, failing on the first bad record
pub fn decode_records(bytes: &[u8]) -> Result<Vec<TelemetryRecord>> {
    BinaryReader::new(bytes)?.collect()
}

/// A fully read record whose strings are not yet UTF-8 checked
struct RawRecord {
    vehicle_id: Vec<u8>,
    diagnostic_code: Vec<u8>,
    record: TelemetryRecord,
}

impl RawRecord {
    fn into_record(self, index: usize) -> Result<TelemetryRecord> {
        let utf8 = |bytes: Vec<u8>, field: &str| {
            String::from_utf8(bytes)
                .map_err(|e| Error::record_decode(index, format!("{} is not UTF-8: {}", field, e)))
        };
        Ok(TelemetryRecord {
            vehicle_id: utf8(self.vehicle_id, "vehicle_id")?,
            diagnostic_code: utf8(self.diagnostic_code, "diagnostic_code")?,
            ..self.record
        })
    }
}

fn read_bytes<R: Read>(reader: &mut R, len: u8) -> io::Result<Vec<u8>> {
    let mut bytes = vec![0u8; usize::from(len)];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}
