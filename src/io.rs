//! `Sink`/`Source` abstractions for `encode_to_sink`/`decode_from_source`
//! (spec.md §6).
//!
//! These let a caller stream an encoded frame out to (or a frame's bytes
//! in from) something other than an in-memory `Vec<u8>`, without the
//! encoder/decoder caring whether the other end is a file, a socket, or a
//! test double. Blanket impls cover the common cases: any `std::io::Write`
//! is a `Sink`, any `std::io::Read` is a `Source`.

use crate::error::{Error, ErrorKind};

/// Something that accepts appended byte slices, such as a file or socket.
pub trait Sink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

impl<W: std::io::Write> Sink for W {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        std::io::Write::write_all(self, bytes)
            .map_err(|e| Error::with_detail(ErrorKind::StreamError, e.to_string()))
    }
}

/// Something that yields the complete byte content to decode from, such as
/// a file or socket already read to completion by the caller.
pub trait Source {
    fn read_to_end(&mut self) -> Result<Vec<u8>, Error>;
}

impl<R: std::io::Read> Source for R {
    fn read_to_end(&mut self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        std::io::Read::read_to_end(self, &mut buf)
            .map_err(|e| Error::with_detail(ErrorKind::StreamError, e.to_string()))?;
        Ok(buf)
    }
}

/// Encode `value` and append the frame's bytes to `sink` (spec.md §6).
pub fn encode_to_sink<T: serde::Serialize + ?Sized, S: Sink>(
    value: &T,
    sink: &mut S,
) -> Result<(), crate::error::EncodeError> {
    let bytes = crate::encode(value)?;
    sink.write_all(&bytes).map_err(crate::error::EncodeError)?;
    Ok(())
}

/// Read a complete frame's bytes from `source` and decode it (spec.md §6).
pub fn decode_from_source<T: serde::de::DeserializeOwned, S: Source>(
    source: &mut S,
) -> Result<T, crate::error::DecodeError> {
    let bytes = source.read_to_end().map_err(crate::error::DecodeError)?;
    crate::decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_u8_is_a_sink_and_slice_is_a_source() {
        let mut sink: Vec<u8> = Vec::new();
        encode_to_sink(&42i32, &mut sink).unwrap();
        let mut source: &[u8] = sink.as_slice();
        let decoded: i32 = decode_from_source(&mut source).unwrap();
        assert_eq!(decoded, 42);
    }
}
