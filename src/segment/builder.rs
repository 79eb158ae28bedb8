// src/segment/builder.rs
use crate::config::AnalyzerConfig;
use crate::protocol::{
    display_path, ByteWindow, DecodeFailure, DecodeOutput, DecodePath, DecodedField, DecodedList, DecodedMap,
    DecodedStruct, DecodedValue, FramingKind, PathStep, ScopeKind,
};
use crate::schema::{resolve_enum_name, SchemaTables, ValueType};
use crate::segment::gaps::{fill_gaps, Framing};
use crate::segment::{Segment, SegmentKind, SegmentValue};
use crate::types::{ByteRange, WireType};
use crate::utils::decode_text;

/// Turns one decode session's output into a segment tree.
///
/// The builder only reads the decoded values and the recorded offsets; it
/// never touches the file. Fields appear in wire order.
pub struct SegmentBuilder<'a> {
    output: &'a DecodeOutput,
    tables: &'a SchemaTables,
    config: &'a AnalyzerConfig,
    probe: ByteWindow,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(output: &'a DecodeOutput, tables: &'a SchemaTables, config: &'a AnalyzerConfig) -> Self {
        SegmentBuilder {
            output,
            tables,
            config,
            probe: output.window.clone(),
        }
    }

    /// Build the root struct segment under `name`.
    pub fn build(mut self, name: &str) -> Segment {
        let output = self.output;
        let mut path = DecodePath::new();
        let mut root = self.build_struct(&mut path, &output.root, output.struct_name);
        root.name = Some(name.to_string());
        root
    }

    fn failure_at(&self, path: &[PathStep], scope: ScopeKind) -> Option<&'a DecodeFailure> {
        let output = self.output;
        output
            .failure
            .as_ref()
            .filter(|f| f.scope == scope && f.path.as_slice() == path)
    }

    fn range_at(&self, path: &[PathStep]) -> ByteRange {
        self.output
            .records
            .value_range(path)
            .unwrap_or_else(|| ByteRange::empty_at(self.output.range.end))
    }

    fn error_segment(failure: &DecodeFailure, range: ByteRange) -> Segment {
        let start = failure.offset.clamp(range.start, range.end);
        Segment::error(ByteRange::new(start, range.end), failure.message.clone())
            .with_meta("offset", failure.offset)
            .with_meta("path", display_path(&failure.path))
    }

    fn build_struct(&mut self, path: &mut DecodePath, decoded: &'a DecodedStruct, struct_name: Option<&'static str>) -> Segment {
        let output = self.output;
        let range = self.range_at(path);
        let mut children = Vec::with_capacity(decoded.fields.len() + 1);
        let mut framing = Vec::new();

        for field in &decoded.fields {
            path.push(PathStep::Field(field.id));
            if let Some(segment) = self.build_field(path, field, struct_name) {
                children.push(segment);
            }
            path.pop();
        }

        if let Some(stop) = output.records.stop(path) {
            let stop_framing = Framing::new(stop, FramingKind::StructStop);
            if self.config.show_list_headers {
                children.push(stop_framing.to_segment());
            }
            framing.push(stop_framing);

            if self.config.show_undefined_optional {
                children.extend(self.absent_markers(decoded, struct_name, stop.start));
            }
        }

        if let Some(failure) = self.failure_at(path, ScopeKind::Struct) {
            children.push(Self::error_segment(failure, range));
        }

        let children = fill_gaps(range, children, &framing, &mut self.probe, self.config);
        let mut segment = Segment::new(range, SegmentKind::ProtocolStruct).with_children(children);
        if let Some(name) = struct_name {
            segment.name = Some(name.to_string());
            segment.set_meta("struct_type", name);
        }
        if !decoded.complete {
            segment.set_meta("complete", false);
        }
        segment
    }

    /// Zero-length markers for schema fields the struct did not carry.
    fn absent_markers(&self, decoded: &DecodedStruct, struct_name: Option<&'static str>, at: u64) -> Vec<Segment> {
        let Some(def) = struct_name.and_then(|name| self.tables.get(name)) else {
            return Vec::new();
        };
        if def.is_union {
            return Vec::new();
        }
        def.fields()
            .filter(|(id, _)| decoded.fields.iter().all(|f| f.id != *id))
            .map(|(id, spec)| {
                Segment::new(ByteRange::empty_at(at), SegmentKind::ProtocolField)
                    .with_name(spec.name())
                    .with_meta("field_id", id)
                    .with_meta("absent", true)
                    .with_meta("required", spec.required())
                    .with_meta("type", spec.describe())
            })
            .collect()
    }

    fn build_field(&mut self, path: &mut DecodePath, field: &'a DecodedField, struct_name: Option<&'static str>) -> Option<Segment> {
        let output = self.output;
        let record = output.records.field(path)?;
        let resolved = self.tables.resolve(struct_name, field.id, field.wire_type);

        let mut segment = Segment::new(record.range(), SegmentKind::ProtocolField)
            .with_meta("field_id", field.id)
            .with_meta("wire_type", field.wire_type.name())
            .with_meta("required", resolved.required)
            .with_meta("header", vec![record.header_range.start, record.header_range.end]);
        segment.name = resolved.name.map(str::to_string);
        if let Some(spec) = resolved.spec {
            let key = if resolved.is_mismatched() { "expected_type" } else { "type" };
            segment.set_meta(key, spec.describe());
        }

        if record.is_packed() {
            if let Some(DecodedValue::Bool(b)) = field.value {
                segment.value = Some(SegmentValue::Bool(b));
            }
            segment.set_meta("packed_in_header", true);
            return Some(segment);
        }

        let hint = if field.wire_type.is_container() {
            resolved.element_type()
        } else {
            resolved.value_type()
        };

        let header = Framing::new(record.header_range, FramingKind::FieldHeader);
        let mut children = Vec::with_capacity(2);
        if self.config.show_list_headers {
            children.push(header.to_segment());
        }
        children.push(self.build_value(path, field.value.as_ref(), field.wire_type, hint));

        let range = segment.range;
        segment.children = fill_gaps(range, children, &[header], &mut self.probe, self.config);
        Some(segment)
    }

    fn build_value(
        &mut self,
        path: &mut DecodePath,
        value: Option<&'a DecodedValue>,
        wire_type: WireType,
        hint: Option<ValueType>,
    ) -> Segment {
        let range = self.range_at(path);
        if let Some(failure) = self.failure_at(path, ScopeKind::Value) {
            return Self::error_segment(failure, range);
        }
        match value {
            None => Segment::error(range, format!("{wire_type} value missing")),
            Some(DecodedValue::Struct(s)) => self.build_struct(path, s, hint.and_then(|h| h.struct_name())),
            Some(DecodedValue::List(list)) => self.build_list(path, list, hint),
            Some(DecodedValue::Map(map)) => self.build_map(path, map),
            Some(scalar) => Self::build_scalar(range, scalar, hint),
        }
    }

    fn build_scalar(range: ByteRange, value: &DecodedValue, hint: Option<ValueType>) -> Segment {
        let mut segment = Segment::new(range, SegmentKind::ProtocolValue).with_meta("wire_type", value.wire_type().name());
        let scalar = match value {
            DecodedValue::Bool(b) => SegmentValue::Bool(*b),
            DecodedValue::Double(d) => SegmentValue::Double(*d),
            DecodedValue::Binary(bytes) => {
                segment.set_meta("length", bytes.len());
                let text = match hint {
                    Some(ValueType::Binary) => None,
                    _ => decode_text(bytes),
                };
                match text {
                    Some(text) => SegmentValue::Text(text),
                    None => SegmentValue::Bytes(bytes.clone()),
                }
            }
            other => match other.as_i64() {
                Some(v) => SegmentValue::Int(v),
                None => return Segment::error(range, format!("{} is not a scalar", other.wire_type())),
            },
        };

        if let Some(hint) = hint {
            segment.set_meta("type", hint.describe());
            if let (Some(kind), SegmentValue::Int(raw)) = (hint.enum_kind(), &scalar) {
                segment.set_meta("enum_type", kind.name());
                if let Some(name) = resolve_enum_name(kind, *raw) {
                    segment.set_meta("enum_name", name);
                }
            }
        }
        segment.with_value(scalar)
    }

    fn build_list(&mut self, path: &mut DecodePath, list: &'a DecodedList, element_hint: Option<ValueType>) -> Segment {
        let output = self.output;
        let range = self.range_at(path);
        let mut children = Vec::with_capacity(list.items.len() + 1);
        let mut framing = Vec::new();

        if let Some(header) = output.records.container(path) {
            let header_framing = Framing::new(header.header_range, FramingKind::ListHeader)
                .with_meta("element_type", list.element_type.name())
                .with_meta("count", header.count);
            if self.config.show_list_headers {
                children.push(header_framing.to_segment());
            }
            framing.push(header_framing);
        }

        let hint = element_hint.filter(|h| h.wire_type() == list.element_type);
        for (i, item) in list.items.iter().enumerate() {
            path.push(PathStep::Element(i as u32));
            children.push(self.build_value(path, Some(item), list.element_type, hint));
            path.pop();
        }
        if !list.complete {
            path.push(PathStep::Element(list.items.len() as u32));
            if self.failure_at(path, ScopeKind::Value).is_some() {
                children.push(self.build_value(path, None, list.element_type, hint));
            }
            path.pop();
        }

        let children = fill_gaps(range, children, &framing, &mut self.probe, self.config);
        let mut segment = Segment::new(range, SegmentKind::ProtocolList)
            .with_children(children)
            .with_meta("wire_type", list.wire_type.name())
            .with_meta("element_type", list.element_type.name())
            .with_meta("count", list.declared_count);
        if let Some(hint) = hint {
            segment.set_meta("type", format!("{}<{}>", list.wire_type.name(), hint.describe()));
        }
        if !list.complete {
            segment.set_meta("complete", false);
        }
        segment
    }

    fn build_map(&mut self, path: &mut DecodePath, map: &'a DecodedMap) -> Segment {
        let output = self.output;
        let range = self.range_at(path);
        let mut children = Vec::with_capacity(map.entries.len() * 2 + 1);
        let mut framing = Vec::new();
        let key_type = map.key_type.unwrap_or(WireType::Binary);
        let value_type = map.value_type.unwrap_or(WireType::Binary);

        if let Some(header) = output.records.container(path) {
            let mut header_framing =
                Framing::new(header.header_range, FramingKind::ListHeader).with_meta("count", header.count);
            if let (Some(k), Some(v)) = (map.key_type, map.value_type) {
                header_framing = header_framing
                    .with_meta("key_type", k.name())
                    .with_meta("element_type", v.name());
            }
            if self.config.show_list_headers {
                children.push(header_framing.to_segment());
            }
            framing.push(header_framing);
        }

        for (i, (key, value)) in map.entries.iter().enumerate() {
            let i = i as u32;
            path.push(PathStep::Key(i));
            children.push(self.build_value(path, Some(key), key_type, None));
            path.pop();
            path.push(PathStep::Value(i));
            children.push(self.build_value(path, value.as_ref(), value_type, None));
            path.pop();
        }
        if !map.complete {
            path.push(PathStep::Key(map.entries.len() as u32));
            if self.failure_at(path, ScopeKind::Value).is_some() {
                children.push(self.build_value(path, None, key_type, None));
            }
            path.pop();
        }

        let children = fill_gaps(range, children, &framing, &mut self.probe, self.config);
        let mut segment = Segment::new(range, SegmentKind::ProtocolList)
            .with_children(children)
            .with_meta("wire_type", WireType::Map.name())
            .with_meta("count", map.declared_count);
        if !map.complete {
            segment.set_meta("complete", false);
        }
        segment
    }
}

/// Build the segment tree of one decoded struct.
pub fn build_struct_segment(output: &DecodeOutput, name: &str, tables: &SchemaTables, config: &AnalyzerConfig) -> Segment {
    SegmentBuilder::new(output, tables, config).build(name)
}
