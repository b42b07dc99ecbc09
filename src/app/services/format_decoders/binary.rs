//! Binary decoder adapter
//!
//! Maps [`BinaryReader`] results onto decode events so the parser can treat
//! the binary format like any other source.

use std::io::Read;

use super::DecodeEvent;
use crate::app::services::binary_codec::BinaryReader;
use crate::{Error, Result};

#[derive(Debug)]
pub struct BinaryDecoder<R> {
    reader: BinaryReader<R>,
}

impl<R: Read> BinaryDecoder<R> {
    /// Validate the header; a mismatch is a fatal [`Error::Format`]
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            reader: BinaryReader::new(reader)?,
        })
    }

    pub fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        match self.reader.next_record() {
            Ok(Some(record)) => Ok(Some(DecodeEvent::Record {
                line: self.reader.records_seen(),
                record,
            })),
            Ok(None) => Ok(None),
            Err(Error::RecordDecode { line, message }) => {
                Ok(Some(DecodeEvent::Rejected { line, reason: message }))
            }
            Err(e) => Err(e),
        }
    }

    /// Records seen so far; each record counts as one line
    pub fn lines_read(&self) -> usize {
        self.reader.records_seen()
    }

    pub fn bytes_read(&self) -> u64 {
        self.reader.bytes_read()
    }
}
