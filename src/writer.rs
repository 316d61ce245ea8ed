//! Append-only growable byte buffer: the write side of the wire format's
//! primitives (spec.md §4.1).

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, ErrorKind};
use crate::varint;

const INITIAL_CAPACITY: usize = 64;

/// A growable output buffer. Doubles its capacity as it grows, starting
/// from at least [`INITIAL_CAPACITY`] bytes, and never hands back a partial
/// frame: callers drop the whole `Writer` on error.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a writer with the default initial capacity.
    pub fn new() -> Self {
        Writer {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether anything has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.buf
            .try_reserve(additional)
            .map_err(|_| Error::new(ErrorKind::OutOfMemory))
    }

    /// Append a raw byte slice.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a single byte.
    pub fn push_u8(&mut self, value: u8) -> Result<(), Error> {
        self.reserve(1)?;
        self.buf.push(value);
        Ok(())
    }

    /// Append a fixed-width little-endian `i64`.
    pub fn push_i64_le(&mut self, value: i64) -> Result<(), Error> {
        self.reserve(8)?;
        // A `Vec<u8>` write never fails; the capacity was just reserved.
        self.buf.write_i64::<LittleEndian>(value).expect("reserved capacity");
        Ok(())
    }

    /// Append a fixed-width little-endian `f64`.
    pub fn push_f64_le(&mut self, value: f64) -> Result<(), Error> {
        self.reserve(8)?;
        self.buf.write_f64::<LittleEndian>(value).expect("reserved capacity");
        Ok(())
    }

    /// Append an unsigned LEB128 varint.
    pub fn push_uvarint(&mut self, value: u64) -> Result<(), Error> {
        self.reserve(10)?;
        varint::push_uvarint(&mut self.buf, value);
        Ok(())
    }

    /// Append a zig-zag signed varint.
    pub fn push_svarint(&mut self, value: i64) -> Result<(), Error> {
        self.reserve(10)?;
        varint::push_svarint(&mut self.buf, value);
        Ok(())
    }

    /// Consume the writer, returning the bytes accumulated so far.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
