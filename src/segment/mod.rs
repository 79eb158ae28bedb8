// src/segment/mod.rs
mod builder;
mod gaps;

pub use builder::{build_struct_segment, SegmentBuilder};
pub use gaps::{classify_gap, fill_gaps, uncovered, FillerProbe, Framing, NoProbe};

use crate::types::ByteRange;
use crate::utils::encode_hex;
use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Logical meaning of a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Magic,
    FooterLength,
    ColumnChunk,
    ProtocolStruct,
    ProtocolField,
    ProtocolList,
    ProtocolValue,
    FieldHeader,
    ListHeader,
    FieldStop,
    Data,
    Padding,
    Unknown,
    Error,
}

impl SegmentKind {
    pub fn name(&self) -> &'static str {
        match self {
            SegmentKind::Magic => "magic",
            SegmentKind::FooterLength => "footer_length",
            SegmentKind::ColumnChunk => "column_chunk",
            SegmentKind::ProtocolStruct => "protocol_struct",
            SegmentKind::ProtocolField => "protocol_field",
            SegmentKind::ProtocolList => "protocol_list",
            SegmentKind::ProtocolValue => "protocol_value",
            SegmentKind::FieldHeader => "field_header",
            SegmentKind::ListHeader => "list_header",
            SegmentKind::FieldStop => "field_stop",
            SegmentKind::Data => "data",
            SegmentKind::Padding => "padding",
            SegmentKind::Unknown => "unknown",
            SegmentKind::Error => "error",
        }
    }

    /// Framing bytes that carry no decoded value.
    pub fn is_framing(&self) -> bool {
        matches!(self, SegmentKind::FieldHeader | SegmentKind::ListHeader | SegmentKind::FieldStop)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded scalar carried by a leaf segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Bytes(Bytes),
}

impl SegmentValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SegmentValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SegmentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            SegmentValue::Bool(b) => JsonValue::Bool(*b),
            SegmentValue::Int(v) => JsonValue::from(*v),
            SegmentValue::Double(v) => JsonValue::from(*v),
            SegmentValue::Text(s) => JsonValue::String(s.clone()),
            SegmentValue::Bytes(b) => JsonValue::String(encode_hex(b)),
        }
    }
}

impl Serialize for SegmentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SegmentValue::Bool(b) => serializer.serialize_bool(*b),
            SegmentValue::Int(v) => serializer.serialize_i64(*v),
            SegmentValue::Double(v) => serializer.serialize_f64(*v),
            SegmentValue::Text(s) => serializer.serialize_str(s),
            SegmentValue::Bytes(b) => serializer.serialize_str(&encode_hex(b)),
        }
    }
}

/// A labeled byte range. Children are contained in `range`, sorted by start
/// and never overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub range: ByteRange,
    pub kind: SegmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SegmentValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Segment>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, JsonValue>,
}

impl Segment {
    pub fn new(range: ByteRange, kind: SegmentKind) -> Self {
        Segment {
            range,
            kind,
            name: None,
            value: None,
            children: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn error(range: ByteRange, message: impl Into<String>) -> Self {
        Segment::new(range, SegmentKind::Error).with_meta("message", message.into())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: SegmentValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Segment>) -> Self {
        self.children = children;
        self
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn meta(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }

    pub fn start(&self) -> u64 {
        self.range.start
    }

    pub fn end(&self) -> u64 {
        self.range.end
    }

    pub fn len(&self) -> u64 {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    pub fn child(&self, name: &str) -> Option<&Segment> {
        self.children.iter().find(|c| c.is_named(name))
    }

    /// Pre-order traversal of this segment and all its descendants.
    pub fn walk(&self) -> SegmentWalk<'_> {
        SegmentWalk { stack: vec![self] }
    }

    /// Child ranges that leave bytes of `range` uncovered or overlap.
    pub fn tiling_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut cursor = self.range.start;
        for child in &self.children {
            if !self.range.contains(&child.range) {
                errors.push(format!("{} child {} escapes {}", child.kind, child.range, self.range));
            }
            if child.range.start < cursor {
                errors.push(format!("{} child {} overlaps byte {}", child.kind, child.range, cursor));
            } else if child.range.start > cursor {
                errors.push(format!("gap [{}, {}) in {}", cursor, child.range.start, self.range));
            }
            cursor = cursor.max(child.range.end);
        }
        if !self.children.is_empty() && cursor != self.range.end {
            errors.push(format!("gap [{}, {}) in {}", cursor, self.range.end, self.range));
        }
        errors
    }

    /// Plain JSON view of the decoded content: structs become objects keyed
    /// by field name, lists become arrays and enums become their names.
    pub fn to_plain_json(&self) -> JsonValue {
        match self.kind {
            SegmentKind::ProtocolStruct => {
                let mut object = serde_json::Map::new();
                for child in &self.children {
                    if child.kind != SegmentKind::ProtocolField || child.meta("absent").is_some() {
                        continue;
                    }
                    let key = match (&child.name, child.meta("field_id")) {
                        (Some(name), _) => name.clone(),
                        (None, Some(id)) => format!("field_{id}"),
                        (None, None) => continue,
                    };
                    object.insert(key, child.to_plain_json());
                }
                JsonValue::Object(object)
            }
            SegmentKind::ProtocolList => JsonValue::Array(
                self.children
                    .iter()
                    .filter(|c| !c.kind.is_framing() && c.kind != SegmentKind::Padding)
                    .map(Segment::to_plain_json)
                    .collect(),
            ),
            SegmentKind::ProtocolField => {
                if let Some(value) = &self.value {
                    return value.to_json();
                }
                self.children
                    .iter()
                    .find(|c| !c.kind.is_framing())
                    .map(Segment::to_plain_json)
                    .unwrap_or(JsonValue::Null)
            }
            SegmentKind::Error => JsonValue::Null,
            _ => match self.meta("enum_name") {
                Some(name) => name.clone(),
                None => self.value.as_ref().map(SegmentValue::to_json).unwrap_or(JsonValue::Null),
            },
        }
    }
}

pub struct SegmentWalk<'a> {
    stack: Vec<&'a Segment>,
}

impl<'a> Iterator for SegmentWalk<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.stack.pop()?;
        self.stack.extend(segment.children.iter().rev());
        Some(segment)
    }
}

/// Sort segments by start, zero-length markers before what starts at the same byte.
pub fn sort_segments(segments: &mut [Segment]) {
    segments.sort_by_key(|s| (s.range.start, s.range.end));
}
