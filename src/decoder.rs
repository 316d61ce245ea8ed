//! Strict, all-or-nothing parse of a framed byte sequence into a [`Value`]
//! tree (spec.md §4.4).
//!
//! Every declared length (string, bytes, container count) is checked
//! against the reader's *remaining* byte count before anything is
//! allocated, so a small adversarial input can never force an oversized
//! allocation (spec.md §5, "adversarial size").

use crate::error::{Error, ErrorKind};
use crate::marker::Tag;
use crate::reader::Reader;
use crate::value::Value;
use crate::{MAGIC, VERSION};

/// Decode a complete frame, using the default depth bound.
pub fn decode(input: &[u8]) -> Result<Value, Error> {
    decode_with_depth_bound(input, crate::DEFAULT_DEPTH_BOUND)
}

/// Decode a complete frame with an explicit depth bound.
pub fn decode_with_depth_bound(input: &[u8], depth_bound: usize) -> Result<Value, Error> {
    let mut reader = Reader::new(input);
    let magic = reader.read_bytes(4)?;
    if magic != MAGIC {
        return Err(Error::new(ErrorKind::InvalidHeader).at_offset(0));
    }
    let version = reader.read_u8()?;
    if version != VERSION {
        return Err(Error::new(ErrorKind::InvalidHeader).at_offset(4));
    }
    let value = read_value(&mut reader, 0, depth_bound)?;
    if reader.remaining() != 0 {
        return Err(Error::new(ErrorKind::TrailingBytes).at_offset(reader.offset()));
    }
    Ok(value)
}

fn read_value(reader: &mut Reader, depth: usize, bound: usize) -> Result<Value, Error> {
    if depth > bound {
        return Err(Error::new(ErrorKind::DepthExceeded).at_offset(reader.offset()));
    }
    let offset = reader.offset();
    let byte = reader.read_u8()?;
    let tag = Tag::from_u8(byte).ok_or_else(|| Error::new(ErrorKind::TagUnknown).at_offset(offset))?;
    match tag {
        Tag::Null => Ok(Value::Null),
        Tag::BoolFalse => Ok(Value::Bool(false)),
        Tag::BoolTrue => Ok(Value::Bool(true)),
        Tag::Int => Ok(Value::Int(reader.read_svarint()?)),
        Tag::Float => Ok(Value::Float(reader.read_f64_le()?)),
        Tag::Str => {
            let bytes = read_length_prefixed_bytes(reader)?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| Error::new(ErrorKind::InvalidUtf8).at_offset(offset))?;
            Ok(Value::Str(text.to_string()))
        }
        Tag::Bytes => Ok(Value::Bytes(read_length_prefixed_bytes(reader)?.to_vec())),
        Tag::List => {
            let len = read_count(reader)?;
            let mut items = Vec::new();
            items
                .try_reserve(len)
                .map_err(|_| Error::new(ErrorKind::OutOfMemory))?;
            for _ in 0..len {
                items.push(read_value(reader, depth + 1, bound)?);
            }
            Ok(Value::List(items))
        }
        Tag::Tuple => {
            let len = read_count(reader)?;
            let mut items = Vec::new();
            items
                .try_reserve(len)
                .map_err(|_| Error::new(ErrorKind::OutOfMemory))?;
            for _ in 0..len {
                items.push(read_value(reader, depth + 1, bound)?);
            }
            Ok(Value::Tuple(items))
        }
        Tag::Dict => {
            let len = read_count(reader)?;
            let mut entries = Vec::new();
            entries
                .try_reserve(len)
                .map_err(|_| Error::new(ErrorKind::OutOfMemory))?;
            for _ in 0..len {
                let key = read_length_prefixed_bytes(reader)?.to_vec();
                let value = read_value(reader, depth + 1, bound)?;
                entries.push((key, value));
            }
            Ok(Value::Dict(entries))
        }
        Tag::Tagged => {
            let t = reader.read_uvarint()?;
            if t > u32::MAX as u64 {
                return Err(Error::new(ErrorKind::Overflow).at_offset(offset));
            }
            let inner = read_value(reader, depth + 1, bound)?;
            Ok(Value::Tagged(t as u32, Box::new(inner)))
        }
    }
}

/// Read an unsigned varint length/count, checking it against the reader's
/// remaining bytes so a declared length larger than the actual input
/// immediately fails with `Truncated` rather than being handed to an
/// allocator.
fn read_count(reader: &mut Reader) -> Result<usize, Error> {
    let len = reader.read_uvarint()?;
    if len > reader.remaining() as u64 {
        return Err(Error::new(ErrorKind::Truncated).at_offset(reader.offset()));
    }
    Ok(len as usize)
}

fn read_length_prefixed_bytes<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8], Error> {
    let len = reader.read_uvarint()?;
    if len > reader.remaining() as u64 {
        return Err(Error::new(ErrorKind::Truncated).at_offset(reader.offset()));
    }
    reader.read_bytes(len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    #[test]
    fn rejects_bad_magic_with_invalid_header() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::InvalidHeader);
    }

    #[test]
    fn empty_list_round_trips_and_truncated_prefix_fails() {
        let bytes = encode(&Value::List(vec![])).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Value::List(vec![]));
        assert_eq!(
            decode(&bytes[..bytes.len() - 1]).unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn str_with_invalid_utf8_fails_but_same_bytes_as_bytes_succeed() {
        let mut frame = vec![0x43, 0x52, 0x4F, 0x55, 0x02, 0x05, 0x02, 0xC3, 0x28];
        assert_eq!(decode(&frame).unwrap_err().kind(), ErrorKind::InvalidUtf8);
        frame[5] = 0x06;
        assert_eq!(decode(&frame).unwrap(), Value::Bytes(vec![0xC3, 0x28]));
    }

    #[test]
    fn adversarial_declared_length_fails_truncated_not_oom() {
        // Declares a list of 2^32 elements but supplies none.
        let frame = vec![0x43, 0x52, 0x4F, 0x55, 0x02, 0x07, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        assert_eq!(decode(&frame).unwrap_err().kind(), ErrorKind::Truncated);
    }

    #[test]
    fn trailing_bytes_after_value_fail() {
        let mut bytes = encode(&Value::Null).unwrap();
        bytes.push(0x00);
        assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::TrailingBytes);
    }

    #[test]
    fn unknown_tag_byte_fails() {
        let frame = vec![0x43, 0x52, 0x4F, 0x55, 0x02, 0xFF];
        assert_eq!(decode(&frame).unwrap_err().kind(), ErrorKind::TagUnknown);
    }

    #[test]
    fn depth_nested_300_fails_at_bound_256_succeeds_at_300() {
        let mut value = Value::List(vec![]);
        for _ in 0..300 {
            value = Value::List(vec![value]);
        }
        let bytes = crate::encoder::encode_with_depth_bound(&value, 300).unwrap();
        assert_eq!(
            decode_with_depth_bound(&bytes, 256).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
        assert!(decode_with_depth_bound(&bytes, 300).is_ok());
    }

    #[test]
    fn tagged_value_with_no_handler_surfaces_generic() {
        let value = Value::Tagged(7, Box::new(Value::Int(1)));
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }

    #[test]
    fn integer_boundaries_round_trip() {
        for v in [i64::MIN, -1, 0, 1, i64::MAX] {
            let bytes = encode(&Value::Int(v)).unwrap();
            assert_eq!(decode(&bytes).unwrap(), Value::Int(v));
        }
    }
}
