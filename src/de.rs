//! [`Value`] tree → host object: the other half of the host-object bridge
//! (spec.md §4.5).
//!
//! Grounded in the teacher's `FogDeserializer`, adapted to walk an already
//! -decoded `Value` tree rather than a raw byte stream — [`crate::decoder`]
//! owns turning bytes into a `Value`; this module only owns turning a
//! `Value` into an arbitrary `DeserializeOwned` type.
//!
//! Tagged values with no registered interpretation are unwrapped to their
//! inner value, matching the source's documented behavior (spec.md §9,
//! open question 2).

use serde::de::{
    self, value::StrDeserializer, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer,
    MapAccess, SeqAccess, VariantAccess, Visitor,
};

use crate::error::{Error, ErrorKind};
use crate::value::Value;

/// Convert a decoded [`Value`] into an arbitrary host type.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(ValueDeserializer { value })
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn unwrap_tagged(value: Value) -> Value {
        match value {
            Value::Tagged(_, inner) => Self::unwrap_tagged(*inner),
            other => other,
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match Self::unwrap_tagged(self.value) {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::Int(v) => visitor.visit_i64(v),
            Value::Float(v) => visitor.visit_f64(v),
            Value::Str(v) => visitor.visit_string(v),
            Value::Bytes(v) => visitor.visit_byte_buf(v),
            Value::List(items) | Value::Tuple(items) => {
                visitor.visit_seq(SliceSeqAccess { iter: items.into_iter() })
            }
            Value::Dict(entries) => visitor.visit_map(DictMapAccess {
                iter: entries.into_iter(),
                pending_value: None,
            }),
            Value::Tagged(..) => unreachable!("unwrapped above"),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match Self::unwrap_tagged(self.value) {
            Value::Null => visitor.visit_none(),
            other => ValueDeserializer { value: other }.deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match Self::unwrap_tagged(self.value) {
            Value::Str(variant) => visitor.visit_enum(UnitVariantAccess { variant }),
            Value::Dict(mut entries) if entries.len() == 1 => {
                let (key, value) = entries.remove(0);
                let variant = String::from_utf8(key)
                    .map_err(|_| Error::new(ErrorKind::InvalidUtf8))?;
                visitor.visit_enum(VariantContentAccess { variant, value })
            }
            _ => Err(Error::with_detail(
                ErrorKind::InvalidKind,
                "expected a string or single-entry dict for an enum value",
            )),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SliceSeqAccess {
    iter: std::vec::IntoIter<Value>,
}

impl<'de> SeqAccess<'de> for SliceSeqAccess {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer { value }).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct DictMapAccess {
    iter: std::vec::IntoIter<(Vec<u8>, Value)>,
    pending_value: Option<Value>,
}

impl<'de> MapAccess<'de> for DictMapAccess {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.iter.next() {
            Some((key, value)) => {
                let key_text =
                    String::from_utf8(key).map_err(|_| Error::new(ErrorKind::InvalidUtf8))?;
                self.pending_value = Some(value);
                let deserializer: StrDeserializer<Error> = key_text.as_str().into_deserializer();
                seed.deserialize(deserializer).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let value = self
            .pending_value
            .take()
            .expect("next_value_seed called before next_key_seed");
        seed.deserialize(ValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct UnitVariantAccess {
    variant: String,
}

impl<'de> EnumAccess<'de> for UnitVariantAccess {
    type Error = Error;
    type Variant = UnitOnlyVariantAccess;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), Error> {
        let deserializer: StrDeserializer<Error> = self.variant.as_str().into_deserializer();
        let value = seed.deserialize(deserializer)?;
        Ok((value, UnitOnlyVariantAccess))
    }
}

struct UnitOnlyVariantAccess;

impl<'de> VariantAccess<'de> for UnitOnlyVariantAccess {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, _seed: T) -> Result<T::Value, Error> {
        Err(Error::with_detail(
            ErrorKind::InvalidKind,
            "expected a unit variant but found a value",
        ))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value, Error> {
        Err(Error::with_detail(
            ErrorKind::InvalidKind,
            "expected a unit variant but found a tuple",
        ))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Error> {
        Err(Error::with_detail(
            ErrorKind::InvalidKind,
            "expected a unit variant but found a struct",
        ))
    }
}

struct VariantContentAccess {
    variant: String,
    value: Value,
}

impl<'de> EnumAccess<'de> for VariantContentAccess {
    type Error = Error;
    type Variant = ContentVariantAccess;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), Error> {
        let deserializer: StrDeserializer<Error> = self.variant.as_str().into_deserializer();
        let value = seed.deserialize(deserializer)?;
        Ok((value, ContentVariantAccess { value: self.value }))
    }
}

struct ContentVariantAccess {
    value: Value,
}

impl<'de> VariantAccess<'de> for ContentVariantAccess {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        Err(Error::with_detail(
            ErrorKind::InvalidKind,
            "expected a value but found a unit variant",
        ))
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, Error> {
        seed.deserialize(ValueDeserializer { value: self.value })
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_seq(ValueDeserializer { value: self.value }, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_map(ValueDeserializer { value: self.value }, visitor)
    }
}
