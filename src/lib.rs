//! Compact self-describing binary serialization for tree-shaped dynamic
//! values.
//!
//! A frame is always `magic | version | value`: four magic bytes, one
//! version byte, then exactly one encoded [`Value`]. [`encode`]/[`decode`]
//! go directly between an encoded frame and any `Serialize`/
//! `DeserializeOwned` Rust type, routing through the host-object bridge
//! ([`ser`]/[`de`]) and the value tree ([`value`]) on the way to or from
//! bytes ([`encoder`]/[`decoder`]).
//!
//! ```
//! let bytes = crous::encode(&vec![1, 2, 3]).unwrap();
//! assert_eq!(&bytes[0..5], &[0x43, 0x52, 0x4F, 0x55, 0x02]);
//! let back: Vec<i32> = crous::decode(&bytes).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

mod de;
mod decoder;
mod depth_tracking;
mod encoder;
mod error;
mod io;
mod marker;
mod reader;
mod registry;
mod ser;
mod value;
mod varint;
mod writer;

pub use crate::error::{DecodeError, EncodeError, Error, ErrorKind};
pub use crate::io::{decode_from_source, encode_to_sink, Sink, Source};
pub use crate::registry::{
    has_decoder, has_serializer, register_decoder, register_serializer, unregister_decoder,
    unregister_serializer, DecoderFn, HostKind, SerializerFn,
};
pub use crate::value::{Value, ValueRef};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The four-byte identifier at the start of every encoded frame.
pub const MAGIC: [u8; 4] = [0x43, 0x52, 0x4F, 0x55];

/// The wire-format generation this crate reads and writes.
pub const VERSION: u8 = 0x02;

/// Default container-nesting bound used by [`encode`]/[`decode`] when the
/// caller does not pick one explicitly (spec.md §9).
pub const DEFAULT_DEPTH_BOUND: usize = 256;

/// Encode any `Serialize` host value into a complete frame, using the
/// default depth bound.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode_with_depth_bound(value, DEFAULT_DEPTH_BOUND)
}

/// Encode any `Serialize` host value into a complete frame with an
/// explicit depth bound.
pub fn encode_with_depth_bound<T: Serialize + ?Sized>(
    value: &T,
    depth_bound: usize,
) -> Result<Vec<u8>, EncodeError> {
    let tree = ser::to_value_with_depth_bound(value, depth_bound).map_err(EncodeError)?;
    encoder::encode_with_depth_bound(&tree, depth_bound).map_err(EncodeError)
}

/// Decode a complete frame into any `DeserializeOwned` host type, using the
/// default depth bound.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    decode_with_depth_bound(bytes, DEFAULT_DEPTH_BOUND)
}

/// Decode a complete frame into any `DeserializeOwned` host type with an
/// explicit depth bound.
pub fn decode_with_depth_bound<T: DeserializeOwned>(
    bytes: &[u8],
    depth_bound: usize,
) -> Result<T, DecodeError> {
    let tree = decoder::decode_with_depth_bound(bytes, depth_bound).map_err(DecodeError)?;
    de::from_value(tree).map_err(DecodeError)
}

/// Encode a [`Value`] tree directly into a complete frame, bypassing the
/// host-object bridge, using the default depth bound.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, EncodeError> {
    encoder::encode(value).map_err(EncodeError)
}

/// Decode a complete frame directly into a [`Value`] tree, bypassing the
/// host-object bridge, using the default depth bound.
pub fn decode_value(bytes: &[u8]) -> Result<Value, DecodeError> {
    decoder::decode(bytes).map_err(DecodeError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[test]
    fn round_trips_a_map_scenario_from_the_wire_format_examples() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Person {
            name: String,
            age: i32,
            active: bool,
        }
        let original = Person {
            name: "Alice".to_string(),
            age: 30,
            active: true,
        };
        let bytes = encode(&original).unwrap();
        assert_eq!(&bytes[0..5], &MAGIC_WITH_VERSION);
        let restored: Person = decode(&bytes).unwrap();
        assert_eq!(original, restored);
    }

    const MAGIC_WITH_VERSION: [u8; 5] = [0x43, 0x52, 0x4F, 0x55, 0x02];

    #[test]
    fn rejects_bad_magic() {
        let err = decode::<i32>(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
    }

    #[test]
    fn map_with_non_text_key_fails_with_invalid_key() {
        let mut map = BTreeMap::new();
        map.insert(1i32, "one");
        let err = encode(&map).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKey);
    }

    #[test]
    fn encode_to_sink_and_decode_from_source_round_trip() {
        let mut sink: Vec<u8> = Vec::new();
        encode_to_sink(&"hello", &mut sink).unwrap();
        let mut source: &[u8] = sink.as_slice();
        let restored: String = decode_from_source(&mut source).unwrap();
        assert_eq!(restored, "hello");
    }

    #[test]
    fn encode_value_and_decode_value_round_trip_without_the_bridge() {
        let original = Value::List(vec![Value::Int(1), Value::Str("two".to_string())]);
        let bytes = encode_value(&original).unwrap();
        assert_eq!(decode_value(&bytes).unwrap(), original);
    }

    #[test]
    fn depth_bound_rejects_deeply_nested_vecs() {
        let nested = vec![vec![vec![1i32]]];
        assert!(encode_with_depth_bound(&nested, 3).is_ok());
        assert_eq!(
            encode_with_depth_bound(&nested, 1).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
    }

    #[test]
    fn round_tripped_struct_matches_expected_json_shape() {
        // serde_json gives a readable structural comparison for assertion
        // failures, rather than a Person { .. } Debug dump.
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Config {
            host: String,
            port: u16,
            tags: Vec<String>,
        }
        let original = Config {
            host: "localhost".to_string(),
            port: 8080,
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let bytes = encode(&original).unwrap();
        let restored: Config = decode(&bytes).unwrap();
        assert_eq!(
            serde_json::to_value(&restored).unwrap(),
            serde_json::json!({"host": "localhost", "port": 8080, "tags": ["a", "b"]})
        );
    }
}
