//! Mapping records into ordered value trees.
//!
//! [`to_value`] drives any `Serialize` type through a custom serializer whose
//! output is a [`Value`] tree instead of bytes. Struct fields are visited in
//! declaration order and collected into a [`FieldMap`], so the eventual JSON
//! encoding preserves that order end to end. Kinds with no sensible wire
//! mapping fail fast with an [`EncodeError`]: `Option` fields, data-carrying
//! enum variants, and map keys that are not strings.

use serde::ser::{self, Impossible, Serialize};

use super::{EncodeError, FieldMap, Value};

/// Maps a record into an ordered [`Value`] tree.
///
/// Fields are visited in declaration order with wire names taken from the
/// record's serde attributes. Nested records produce nested maps (order
/// preserved transitively), sequences and fixed-size arrays produce lists,
/// and string-keyed maps recurse over their entries in the source map's
/// iteration order. Tri-state fields encode their null states through the
/// unit kind and pass; plain `Option` fields are rejected with
/// [`EncodeError::OptionField`].
///
/// # Example
///
/// ```
/// # use directus_client::value::to_value;
/// # use serde::Serialize;
/// #[derive(Serialize)]
/// struct Sample {
///     #[serde(rename = "str-val")]
///     str_val: String,
///     #[serde(rename = "int-val")]
///     int_val: i64,
/// }
///
/// let sample = Sample {
///     str_val: "abcd".to_string(),
///     int_val: -43,
/// };
/// let value = to_value(&sample).unwrap();
/// assert_eq!(
///     serde_json::to_string(&value).unwrap(),
///     r#"{"str-val":"abcd","int-val":-43}"#
/// );
/// ```
pub fn to_value<T>(record: &T) -> Result<Value, EncodeError>
where
    T: Serialize + ?Sized,
{
    record.serialize(ValueSerializer)
}

/// Serializer producing [`Value`] trees.
struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = ListSerializer;
    type SerializeTuple = ListSerializer;
    type SerializeTupleStruct = ListSerializer;
    type SerializeTupleVariant = Impossible<Value, EncodeError>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = RecordSerializer;
    type SerializeStructVariant = Impossible<Value, EncodeError>;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::Uint(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::Uint(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::Uint(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        Ok(Value::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodeError> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodeError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::List(
            v.iter().map(|b| Value::Uint(u64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Err(EncodeError::OptionField)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(EncodeError::OptionField)
    }

    // Tri-state fields emit their null states through the unit kind, which
    // keeps them distinguishable from Option fields.
    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Value, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(EncodeError::UnsupportedType {
            kind: format!("enum variant {name}::{variant} with data"),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Ok(ListSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(EncodeError::UnsupportedType {
            kind: format!("enum variant {name}::{variant} with data"),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Ok(MapSerializer {
            entries: FieldMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Ok(RecordSerializer {
            fields: FieldMap::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(EncodeError::UnsupportedType {
            kind: format!("enum variant {name}::{variant} with data"),
        })
    }
}

/// Collects sequence, tuple and array elements into a [`Value::List`].
struct ListSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for ListSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for ListSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for ListSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

/// Collects map entries, rejecting non-string keys.
struct MapSerializer {
    entries: FieldMap,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.pending_key.take().ok_or_else(|| EncodeError::Message {
            reason: "map value serialized before its key".to_string(),
        })?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(self.entries))
    }
}

/// Collects struct fields in declaration order.
struct RecordSerializer {
    fields: FieldMap,
}

impl ser::SerializeStruct for RecordSerializer {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.fields.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(self.fields))
    }
}

/// Serializer for map keys, accepting only strings.
struct KeySerializer;

impl KeySerializer {
    fn reject(kind: &str) -> EncodeError {
        EncodeError::NonStringKey {
            kind: kind.to_string(),
        }
    }
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = EncodeError;

    type SerializeSeq = Impossible<String, EncodeError>;
    type SerializeTuple = Impossible<String, EncodeError>;
    type SerializeTupleStruct = Impossible<String, EncodeError>;
    type SerializeTupleVariant = Impossible<String, EncodeError>;
    type SerializeMap = Impossible<String, EncodeError>;
    type SerializeStruct = Impossible<String, EncodeError>;
    type SerializeStructVariant = Impossible<String, EncodeError>;

    fn serialize_str(self, v: &str) -> Result<String, EncodeError> {
        Ok(v.to_string())
    }

    // Newtype wrappers around strings stay transparent.
    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, EncodeError> {
        Err(Self::reject("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, EncodeError> {
        Err(Self::reject("int"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, EncodeError> {
        Err(Self::reject("int"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, EncodeError> {
        Err(Self::reject("int"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, EncodeError> {
        Err(Self::reject("int"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, EncodeError> {
        Err(Self::reject("uint"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, EncodeError> {
        Err(Self::reject("uint"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, EncodeError> {
        Err(Self::reject("uint"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, EncodeError> {
        Err(Self::reject("uint"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, EncodeError> {
        Err(Self::reject("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, EncodeError> {
        Err(Self::reject("float"))
    }

    fn serialize_char(self, _v: char) -> Result<String, EncodeError> {
        Err(Self::reject("char"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, EncodeError> {
        Err(Self::reject("bytes"))
    }

    fn serialize_none(self) -> Result<String, EncodeError> {
        Err(Self::reject("option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(Self::reject("option"))
    }

    fn serialize_unit(self) -> Result<String, EncodeError> {
        Err(Self::reject("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, EncodeError> {
        Err(Self::reject("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String, EncodeError> {
        Err(Self::reject("enum variant"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(Self::reject("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(Self::reject("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(Self::reject("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(Self::reject("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(Self::reject("enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(Self::reject("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(Self::reject("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(Self::reject("enum variant"))
    }
}
