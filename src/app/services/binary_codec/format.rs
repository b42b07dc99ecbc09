//! Binary stream header and record layout
//!
//! ```text
//! Header (5 bytes)
//! ┌────────┬─────────┬───────────────────────────────────────┐
//! │ Offset │ Size    │ Description                           │
//! ├────────┼─────────┼───────────────────────────────────────┤
//! │ 0x00   │ 4 bytes │ Magic 0x464C4554, little-endian       │
//! │ 0x04   │ 1 byte  │ Version (1)                           │
//! └────────┴─────────┴───────────────────────────────────────┘
//!
//! Record (repeated until end of stream, all integers little-endian)
//!   u8  vehicle_id length | vehicle_id bytes
//!   i64 timestamp
//!   f64 latitude | f64 longitude | f64 speed | f64 heading
//!   i32 engine_rpm
//!   f64 fuel_level | f64 odometer_km | f64 engine_temp | f64 battery_volt
//!   u8  diagnostic_code length | diagnostic_code bytes (0 = no fault)
//! ```
//!
//! There is no record count and no checksum; a clean end of stream after a
//! complete record terminates the sequence.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::constants::{BINARY_MAGIC, BINARY_VERSION};
use crate::{Error, Result};

/// The fixed 5-byte stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub magic: u32,
    pub version: u8,
}

impl Default for BinaryHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryHeader {
    /// Header for the current format version
    pub fn new() -> Self {
        Self {
            magic: BINARY_MAGIC,
            version: BINARY_VERSION,
        }
    }

    /// Write the header
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u8(self.version)
    }

    /// Read and validate a header
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if the stream is shorter than a header, the magic
    ///   does not match or the version is unsupported.
    /// - [`Error::Io`] for any other read failure.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let magic = reader.read_u32::<LittleEndian>().map_err(header_read_error)?;
        if magic != BINARY_MAGIC {
            return Err(Error::format(format!(
                "invalid magic {:#010X}, expected {:#010X}",
                magic, BINARY_MAGIC
            )));
        }

        let version = reader.read_u8().map_err(header_read_error)?;
        if version != BINARY_VERSION {
            return Err(Error::format(format!(
                "unsupported version {}, expected {}",
                version, BINARY_VERSION
            )));
        }

        Ok(Self { magic, version })
    }
}

fn header_read_error(error: io::Error) -> Error {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        Error::format("stream is too short for the binary header")
    } else {
        Error::io("Failed to read binary header", error)
    }
}
