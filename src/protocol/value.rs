// src/protocol/value.rs
use crate::types::WireType;
use bytes::Bytes;

/// Fully decoded compact-protocol value, independent of byte positions.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    Binary(Bytes),
    Struct(DecodedStruct),
    List(DecodedList),
    Map(DecodedMap),
}

/// Struct fields in the order they appeared on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedStruct {
    pub fields: Vec<DecodedField>,
    /// False when decoding stopped inside this struct.
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub id: i16,
    pub wire_type: WireType,
    /// `None` when the value could not be decoded at all.
    pub value: Option<DecodedValue>,
}

/// A list or a set.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedList {
    pub wire_type: WireType,
    pub element_type: WireType,
    pub declared_count: u32,
    pub items: Vec<DecodedValue>,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMap {
    pub key_type: Option<WireType>,
    pub value_type: Option<WireType>,
    pub declared_count: u32,
    pub entries: Vec<(DecodedValue, Option<DecodedValue>)>,
    pub complete: bool,
}

impl DecodedValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            DecodedValue::Bool(_) => WireType::Bool,
            DecodedValue::I8(_) => WireType::I8,
            DecodedValue::I16(_) => WireType::I16,
            DecodedValue::I32(_) => WireType::I32,
            DecodedValue::I64(_) => WireType::I64,
            DecodedValue::Double(_) => WireType::Double,
            DecodedValue::Binary(_) => WireType::Binary,
            DecodedValue::Struct(_) => WireType::Struct,
            DecodedValue::List(list) => list.wire_type,
            DecodedValue::Map(_) => WireType::Map,
        }
    }

    /// Any integer value widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::I8(v) => Some(*v as i64),
            DecodedValue::I16(v) => Some(*v as i64),
            DecodedValue::I32(v) => Some(*v as i64),
            DecodedValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            DecodedValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_struct(&self) -> Option<&DecodedStruct> {
        match self {
            DecodedValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&DecodedList> {
        match self {
            DecodedValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl DecodedStruct {
    pub fn field(&self, id: i16) -> Option<&DecodedValue> {
        self.fields
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.value.as_ref())
    }

    pub fn i64_field(&self, id: i16) -> Option<i64> {
        self.field(id).and_then(DecodedValue::as_i64)
    }

    pub fn bool_field(&self, id: i16) -> Option<bool> {
        self.field(id).and_then(DecodedValue::as_bool)
    }

    pub fn str_field(&self, id: i16) -> Option<&str> {
        self.field(id).and_then(DecodedValue::as_str)
    }

    pub fn struct_field(&self, id: i16) -> Option<&DecodedStruct> {
        self.field(id).and_then(DecodedValue::as_struct)
    }

    pub fn list_field(&self, id: i16) -> Option<&DecodedList> {
        self.field(id).and_then(DecodedValue::as_list)
    }
}
