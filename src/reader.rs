//! Bounded cursor over an input byte slice: the read side of the wire
//! format's primitives (spec.md §4.2).

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, ErrorKind};
use crate::varint;

/// A cursor over `&[u8]` that checks remaining length before every read and
/// never panics on malformed input.
pub struct Reader<'a> {
    buf: &'a [u8],
    /// Bytes consumed since construction, used for error offsets.
    consumed: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, consumed: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Current offset from the start of the original input, for error
    /// reporting.
    pub fn offset(&self) -> usize {
        self.consumed
    }

    fn truncated(&self) -> Error {
        Error::new(ErrorKind::Truncated).at_offset(self.consumed)
    }

    fn advance(&mut self, n: usize) {
        self.buf = &self.buf[n..];
        self.consumed += n;
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let byte = *self.buf.first().ok_or_else(|| self.truncated())?;
        self.advance(1);
        Ok(byte)
    }

    /// Read `n` raw bytes as a borrowed slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.buf.len() < n {
            return Err(self.truncated());
        }
        let (data, rest) = self.buf.split_at(n);
        self.buf = rest;
        self.consumed += n;
        Ok(data)
    }

    /// Read a fixed-width little-endian `i64`.
    pub fn read_i64_le(&mut self) -> Result<i64, Error> {
        let mut bytes = self.read_bytes(8)?;
        Ok(bytes.read_i64::<LittleEndian>().expect("length checked above"))
    }

    /// Read a fixed-width little-endian `f64`.
    pub fn read_f64_le(&mut self) -> Result<f64, Error> {
        let mut bytes = self.read_bytes(8)?;
        Ok(bytes.read_f64::<LittleEndian>().expect("length checked above"))
    }

    /// Read an unsigned LEB128 varint.
    pub fn read_uvarint(&mut self) -> Result<u64, Error> {
        let before = self.buf.len();
        let mut slice = self.buf;
        let value = varint::read_uvarint(&mut slice).map_err(|e| {
            // Truncated mid-varint still reports the offset at which reading
            // of the varint began, which is what the caller observed failing.
            if e.kind() == ErrorKind::Truncated {
                self.truncated()
            } else {
                e.at_offset(self.consumed)
            }
        })?;
        let consumed = before - slice.len();
        self.advance(consumed);
        Ok(value)
    }

    /// Read a zig-zag signed varint.
    pub fn read_svarint(&mut self) -> Result<i64, Error> {
        let before = self.buf.len();
        let mut slice = self.buf;
        let value = varint::read_svarint(&mut slice).map_err(|e| {
            if e.kind() == ErrorKind::Truncated {
                self.truncated()
            } else {
                e.at_offset(self.consumed)
            }
        })?;
        let consumed = before - slice.len();
        self.advance(consumed);
        Ok(value)
    }
}
