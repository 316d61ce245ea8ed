//! Depth-bounded traversal of a [`Value`] tree into the framed byte sequence
//! of spec.md §4.3: `magic | version | value`.
//!
//! Dict entries are written in the order they appear in the `Value::Dict`
//! vector — unlike the teacher's MessagePack canonical form, this codec
//! does not sort keys. The value model explicitly keeps insertion order
//! (spec.md §3), so sorting here would silently disagree with what the
//! decoder hands back.

use crate::error::{Error, ErrorKind};
use crate::marker::Tag;
use crate::value::Value;
use crate::writer::Writer;
use crate::{MAGIC, VERSION};

/// Encode `value` into a complete frame, using the default depth bound.
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    encode_with_depth_bound(value, crate::DEFAULT_DEPTH_BOUND)
}

/// Encode `value` with an explicit depth bound.
pub fn encode_with_depth_bound(value: &Value, depth_bound: usize) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new();
    writer.push_bytes(&MAGIC)?;
    writer.push_u8(VERSION)?;
    write_value(&mut writer, value, 0, depth_bound)?;
    Ok(writer.into_vec())
}

fn write_value(writer: &mut Writer, value: &Value, depth: usize, bound: usize) -> Result<(), Error> {
    if depth > bound {
        return Err(Error::new(ErrorKind::DepthExceeded));
    }
    match value {
        Value::Null => writer.push_u8(Tag::Null.into()),
        Value::Bool(false) => writer.push_u8(Tag::BoolFalse.into()),
        Value::Bool(true) => writer.push_u8(Tag::BoolTrue.into()),
        Value::Int(v) => {
            writer.push_u8(Tag::Int.into())?;
            writer.push_svarint(*v)
        }
        Value::Float(v) => {
            writer.push_u8(Tag::Float.into())?;
            writer.push_f64_le(*v)
        }
        Value::Str(v) => {
            writer.push_u8(Tag::Str.into())?;
            writer.push_uvarint(v.len() as u64)?;
            writer.push_bytes(v.as_bytes())
        }
        Value::Bytes(v) => {
            writer.push_u8(Tag::Bytes.into())?;
            writer.push_uvarint(v.len() as u64)?;
            writer.push_bytes(v)
        }
        Value::List(items) => {
            writer.push_u8(Tag::List.into())?;
            writer.push_uvarint(items.len() as u64)?;
            for item in items {
                write_value(writer, item, depth + 1, bound)?;
            }
            Ok(())
        }
        Value::Tuple(items) => {
            writer.push_u8(Tag::Tuple.into())?;
            writer.push_uvarint(items.len() as u64)?;
            for item in items {
                write_value(writer, item, depth + 1, bound)?;
            }
            Ok(())
        }
        Value::Dict(entries) => {
            writer.push_u8(Tag::Dict.into())?;
            writer.push_uvarint(entries.len() as u64)?;
            for (key, val) in entries {
                writer.push_uvarint(key.len() as u64)?;
                writer.push_bytes(key)?;
                write_value(writer, val, depth + 1, bound)?;
            }
            Ok(())
        }
        Value::Tagged(tag, inner) => {
            writer.push_u8(Tag::Tagged.into())?;
            writer.push_uvarint(*tag as u64)?;
            write_value(writer, inner, depth + 1, bound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_starts_with_magic_and_version() {
        let bytes = encode(&Value::Null).unwrap();
        assert_eq!(&bytes[0..5], &[0x43, 0x52, 0x4F, 0x55, 0x02]);
    }

    #[test]
    fn empty_list_matches_spec_scenario_2() {
        let bytes = encode(&Value::List(vec![])).unwrap();
        assert_eq!(bytes, vec![0x43, 0x52, 0x4F, 0x55, 0x02, 0x07, 0x00]);
    }

    #[test]
    fn tuple_matches_spec_scenario_3() {
        let value = Value::Tuple(vec![
            Value::Int(1),
            Value::Str("a".to_string()),
            Value::Null,
        ]);
        let bytes = encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x43, 0x52, 0x4F, 0x55, 0x02, 0x08, 0x03, 0x03, 0x02, 0x05, 0x01, 0x61, 0x00,
            ]
        );
    }

    #[test]
    fn bytes_matches_spec_scenario_4() {
        let value = Value::Bytes(vec![0x00, 0xFF]);
        let bytes = encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![0x43, 0x52, 0x4F, 0x55, 0x02, 0x06, 0x02, 0x00, 0xFF]
        );
    }

    #[test]
    fn nesting_past_bound_fails_with_depth_exceeded() {
        let mut value = Value::List(vec![]);
        for _ in 0..300 {
            value = Value::List(vec![value]);
        }
        assert_eq!(
            encode_with_depth_bound(&value, 256).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
        assert!(encode_with_depth_bound(&value, 300).is_ok());
    }

    #[test]
    fn determinism_two_encodes_are_byte_identical() {
        let value = Value::Dict(vec![
            (b"name".to_vec(), Value::Str("Alice".to_string())),
            (b"age".to_vec(), Value::Int(30)),
        ]);
        assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());
    }

    #[test]
    fn tagged_with_max_u32_tag_encodes() {
        let value = Value::Tagged(u32::MAX, Box::new(Value::Null));
        assert!(encode(&value).is_ok());
    }
}
