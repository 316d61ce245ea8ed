//! Host object → [`Value`] tree: one half of the host-object bridge
//! (spec.md §4.5).
//!
//! Grounded in the teacher's `FogSerializer`, adapted to build a `Value`
//! tree instead of emitting bytes directly — bytes are the encoder's job
//! ([`crate::encoder`]), not the bridge's.
//!
//! Enum variants have no dedicated `Value` kind (spec.md's host-kind table
//! lists none), so they are represented the way the teacher represents
//! them: a single-entry `Dict` whose key is the variant name.

use serde::ser::{self, Serialize};

use crate::depth_tracking::{ContainerStart, DepthTracker};
use crate::error::Error;
use crate::value::Value;

/// Convert any `Serialize` host value into a [`Value`] tree, using the
/// default depth bound.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    to_value_with_depth_bound(value, crate::DEFAULT_DEPTH_BOUND)
}

/// Convert any `Serialize` host value into a [`Value`] tree with an
/// explicit depth bound.
pub fn to_value_with_depth_bound<T: Serialize + ?Sized>(
    value: &T,
    depth_bound: usize,
) -> Result<Value, Error> {
    let mut serializer = ValueSerializer {
        depth: DepthTracker::new(depth_bound),
    };
    value.serialize(&mut serializer)
}

struct ValueSerializer {
    depth: DepthTracker,
}

impl<'a> ser::Serializer for &'a mut ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        self.serialize_i64(v as i64)
    }
    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        self.serialize_i64(v as i64)
    }
    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        self.serialize_i64(v as i64)
    }
    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        self.serialize_u64(v as u64)
    }
    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        self.serialize_u64(v as u64)
    }
    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        self.serialize_u64(v as u64)
    }
    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        let v = i64::try_from(v).map_err(|_| Error::new(crate::error::ErrorKind::Overflow))?;
        self.serialize_i64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        self.serialize_f64(v as f64)
    }
    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        self.serialize_str(&v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        self.depth.update(None)?;
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        self.depth.update(Some(ContainerStart::Tagged))?;
        let inner = value.serialize(&mut *self)?;
        Ok(Value::Dict(vec![(variant.as_bytes().to_vec(), inner)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer<'a>, Error> {
        self.depth
            .update(Some(ContainerStart::Seq(len.unwrap_or(0))))?;
        Ok(SeqSerializer {
            ser: self,
            items: Vec::new(),
            as_tuple: false,
            variant: None,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer<'a>, Error> {
        self.depth.update(Some(ContainerStart::Seq(len)))?;
        Ok(SeqSerializer {
            ser: self,
            items: Vec::new(),
            as_tuple: true,
            variant: None,
        })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>, Error> {
        self.serialize_tuple(len)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>, Error> {
        self.depth.update(Some(ContainerStart::Tagged))?;
        self.depth.update(Some(ContainerStart::Seq(len)))?;
        Ok(SeqSerializer {
            ser: self,
            items: Vec::new(),
            as_tuple: true,
            variant: Some(variant),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer<'a>, Error> {
        self.depth
            .update(Some(ContainerStart::Map(len.unwrap_or(0))))?;
        Ok(MapSerializer {
            ser: self,
            entries: Vec::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<StructSerializer<'a>, Error> {
        self.depth.update(Some(ContainerStart::Fields(len)))?;
        Ok(StructSerializer {
            ser: self,
            entries: Vec::new(),
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructSerializer<'a>, Error> {
        self.depth.update(Some(ContainerStart::Tagged))?;
        self.depth.update(Some(ContainerStart::Fields(len)))?;
        Ok(StructSerializer {
            ser: self,
            entries: Vec::new(),
            variant: Some(variant),
        })
    }
}

struct SeqSerializer<'a> {
    ser: &'a mut ValueSerializer,
    items: Vec<Value>,
    as_tuple: bool,
    /// Set only for `serialize_tuple_variant`: the finished tuple is
    /// wrapped in a single-entry dict keyed by the variant name on `end()`.
    variant: Option<&'static str>,
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(&mut *self.ser)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let seq = if self.as_tuple {
            Value::Tuple(self.items)
        } else {
            Value::List(self.items)
        };
        Ok(match self.variant {
            Some(variant) => Value::Dict(vec![(variant.as_bytes().to_vec(), seq)]),
            None => seq,
        })
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl<'a> ser::SerializeTupleVariant for SeqSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

struct MapSerializer<'a> {
    ser: &'a mut ValueSerializer,
    entries: Vec<(Vec<u8>, Value)>,
    pending_key: Option<Vec<u8>>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Error> {
        let key_value = key.serialize(&mut *self.ser)?;
        let text = key_value
            .as_str()
            .ok_or_else(|| Error::new(crate::error::ErrorKind::InvalidKey))?;
        self.pending_key = Some(text.as_bytes().to_vec());
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let key = self
            .pending_key
            .take()
            .expect("serialize_value called before serialize_key");
        let value = value.serialize(&mut *self.ser)?;
        self.entries.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Dict(self.entries))
    }
}

struct StructSerializer<'a> {
    ser: &'a mut ValueSerializer,
    entries: Vec<(Vec<u8>, Value)>,
    variant: Option<&'static str>,
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        let value = value.serialize(&mut *self.ser)?;
        self.entries.push((key.as_bytes().to_vec(), value));
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        let dict = Value::Dict(self.entries);
        Ok(match self.variant {
            Some(variant) => Value::Dict(vec![(variant.as_bytes().to_vec(), dict)]),
            None => dict,
        })
    }
}

impl<'a> ser::SerializeStructVariant for StructSerializer<'a> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeStruct::end(self)
    }
}
