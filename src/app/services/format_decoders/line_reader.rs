//! Buffered line reader shared by the text decoders
//!
//! Reads one physical line at a time into a reused byte buffer, so the
//! decoders can split borrowed slices out of it without a per-line allocation.

use std::io::BufRead;
use std::str::Utf8Error;

use crate::constants::LINE_BUFFER_CAPACITY;
use crate::{Error, Result};

/// One physical line borrowed from the reader's buffer
#[derive(Debug)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,

    /// Line content including any line terminator, or the UTF-8 failure
    pub text: std::result::Result<&'a str, Utf8Error>,
}

/// Line reader tracking line numbers and consumed bytes
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    buffer: Vec<u8>,
    lines_read: usize,
    bytes_read: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(LINE_BUFFER_CAPACITY),
            lines_read: 0,
            bytes_read: 0,
        }
    }

    /// Read the next physical line, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<Line<'_>>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| Error::io(format!("Failed to read line {}", self.lines_read + 1), e))?;

        if read == 0 {
            return Ok(None);
        }

        self.lines_read += 1;
        self.bytes_read += read as u64;

        Ok(Some(Line {
            number: self.lines_read,
            text: std::str::from_utf8(&self.buffer),
        }))
    }

    /// Physical lines read so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Bytes consumed so far, line terminators included
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
