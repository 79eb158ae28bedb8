// src/protocol/records.rs
use crate::types::{ByteRange, WireType};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// One step from a decode root down to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStep {
    Field(i16),
    Element(u32),
    Key(u32),
    Value(u32),
}

/// Position of a value relative to the root struct of one decode session.
/// Sibling structs of the same type never share a path, so records keyed by
/// it cannot collide.
pub type DecodePath = SmallVec<[PathStep; 8]>;

/// Render a path as `2.[0].4`, used in log events and error messages.
pub fn display_path(path: &[PathStep]) -> String {
    let mut out = String::new();
    for (i, step) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match step {
            PathStep::Field(id) => out.push_str(&id.to_string()),
            PathStep::Element(i) => out.push_str(&format!("[{i}]")),
            PathStep::Key(i) => out.push_str(&format!("k{i}")),
            PathStep::Value(i) => out.push_str(&format!("v{i}")),
        }
    }
    if out.is_empty() {
        out.push_str("<root>");
    }
    out
}

/// Offsets of one struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub id: i16,
    pub name: Option<&'static str>,
    pub wire_type: WireType,
    /// Bytes encoding the field id and wire type.
    pub header_range: ByteRange,
    /// Bytes encoding the payload. Equal to `header_range` for booleans,
    /// whose value is packed into the header byte.
    pub value_range: ByteRange,
    pub required: bool,
    pub path: DecodePath,
}

impl FieldRecord {
    pub fn is_packed(&self) -> bool {
        self.value_range == self.header_range
    }

    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.header_range.start, self.value_range.end.max(self.header_range.end))
    }
}

/// Header of a list, set or map.
#[derive(Debug, Clone, PartialEq)]
pub struct ListHeaderRecord {
    pub kind: WireType,
    /// Element type, or value type for maps. `None` only for empty maps,
    /// which carry no type byte.
    pub element_type: Option<WireType>,
    pub key_type: Option<WireType>,
    pub count: u32,
    pub header_range: ByteRange,
    pub path: DecodePath,
}

/// Largest element count a list or set header packs into its size nibble.
pub const COMPACT_SHORT_LIST_MAX: u32 = 14;

impl ListHeaderRecord {
    /// True when the count lives in the header byte itself (no varint follows).
    pub fn is_short_form(&self) -> bool {
        self.kind != WireType::Map && self.count <= COMPACT_SHORT_LIST_MAX
    }
}

/// Framing bytes that carry no value of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingKind {
    FieldHeader,
    ListHeader,
    StructStop,
}

impl fmt::Display for FramingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FramingKind::FieldHeader => "field_header",
            FramingKind::ListHeader => "list_header",
            FramingKind::StructStop => "field_stop",
        })
    }
}

/// Everything one session recorded, keyed by decode path.
#[derive(Debug, Clone, Default)]
pub struct SessionRecords {
    pub fields: HashMap<DecodePath, FieldRecord>,
    pub containers: HashMap<DecodePath, ListHeaderRecord>,
    /// Stop marker of each struct, keyed by the struct's own path.
    pub stops: HashMap<DecodePath, ByteRange>,
    /// Range of every decoded value, root included (empty path).
    pub values: HashMap<DecodePath, ByteRange>,
}

impl SessionRecords {
    pub fn field(&self, path: &[PathStep]) -> Option<&FieldRecord> {
        self.fields.get(path)
    }

    pub fn container(&self, path: &[PathStep]) -> Option<&ListHeaderRecord> {
        self.containers.get(path)
    }

    pub fn stop(&self, path: &[PathStep]) -> Option<ByteRange> {
        self.stops.get(path).copied()
    }

    pub fn value_range(&self, path: &[PathStep]) -> Option<ByteRange> {
        self.values.get(path).copied()
    }

    pub fn record_count(&self) -> usize {
        self.fields.len() + self.containers.len() + self.stops.len()
    }
}
