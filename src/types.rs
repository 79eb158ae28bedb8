// src/types.rs
use serde::{Serialize, Serializer};
use std::fmt;
use thrift::protocol::TType;

/// Half-open byte interval `[start, end)` in the analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "range [{start}, {end}) is inverted");
        ByteRange { start, end }
    }

    pub fn empty_at(offset: u64) -> Self {
        ByteRange { start: offset, end: offset }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, other: &ByteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &ByteRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl Serialize for ByteRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

/// Type tag as it appears on the wire in the compact protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    Binary,
    List,
    Set,
    Map,
    Struct,
}

impl WireType {
    /// Map a protocol type tag onto a wire type. `Stop`, `Void` and the
    /// legacy text tags have no wire representation in the compact protocol.
    pub fn from_ttype(ttype: TType) -> Option<Self> {
        match ttype {
            TType::Bool => Some(WireType::Bool),
            TType::I08 => Some(WireType::I8),
            TType::I16 => Some(WireType::I16),
            TType::I32 => Some(WireType::I32),
            TType::I64 => Some(WireType::I64),
            TType::Double => Some(WireType::Double),
            TType::String => Some(WireType::Binary),
            TType::List => Some(WireType::List),
            TType::Set => Some(WireType::Set),
            TType::Map => Some(WireType::Map),
            TType::Struct => Some(WireType::Struct),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, WireType::List | WireType::Set | WireType::Map)
    }

    pub fn is_composite(&self) -> bool {
        self.is_container() || *self == WireType::Struct
    }

    pub fn name(&self) -> &'static str {
        match self {
            WireType::Bool => "bool",
            WireType::I8 => "i8",
            WireType::I16 => "i16",
            WireType::I32 => "i32",
            WireType::I64 => "i64",
            WireType::Double => "double",
            WireType::Binary => "binary",
            WireType::List => "list",
            WireType::Set => "set",
            WireType::Map => "map",
            WireType::Struct => "struct",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
