// src/protocol/session.rs
use crate::config::AnalyzerConfig;
use crate::error::{LensError, Result};
use crate::protocol::records::{display_path, DecodePath, FieldRecord, ListHeaderRecord, PathStep, SessionRecords};
use crate::protocol::tracked_reader::{ByteWindow, PositionHandle, TrackedReader};
use crate::protocol::value::{DecodedField, DecodedList, DecodedMap, DecodedStruct, DecodedValue};
use crate::schema::{SchemaTables, ValueType};
use crate::types::{ByteRange, WireType};
use bytes::Bytes;
use std::io::Read;
use thrift::protocol::{TCompactInputProtocol, TInputProtocol, TType};
use tracing::debug;

/// Deepest struct/container nesting a session follows before giving up.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Which kind of scope a failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A field header or stop marker inside the struct at `path` was malformed.
    /// The struct keeps its decoded fields and gains a trailing error.
    Struct,
    /// The value at `path` itself could not be read.
    Value,
}

/// First protocol failure of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    /// Offset at which the failing read was attempted.
    pub offset: u64,
    pub path: DecodePath,
    pub scope: ScopeKind,
    pub message: String,
}

impl DecodeFailure {
    pub fn to_error(&self) -> LensError {
        LensError::Protocol {
            offset: self.offset,
            message: format!("{} at {}", self.message, display_path(&self.path)),
        }
    }
}

/// Result of decoding one top-level struct.
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    pub struct_name: Option<&'static str>,
    /// Bytes the root struct occupies. Runs to the recovery end when decoding
    /// was interrupted.
    pub range: ByteRange,
    /// Decoded fields; partial when `failure` is set.
    pub root: DecodedStruct,
    pub records: SessionRecords,
    pub failure: Option<DecodeFailure>,
    /// Every byte the protocol consumed.
    pub window: ByteWindow,
}

impl DecodeOutput {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The decoded root, or the failure as a protocol error.
    pub fn into_result(self) -> Result<DecodedStruct> {
        match self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(self.root),
        }
    }
}

/// Partial result carried up the stack once a read fails.
struct Interrupted<T>(T);

type Step<T> = std::result::Result<T, Interrupted<T>>;

/// Offset-tracking decoder for one top-level struct.
///
/// Every field header, container header, stop marker and value is recorded
/// with its absolute byte range, keyed by its [`DecodePath`]. A session is
/// consumed by a single decode call, so no offsets leak between decodes.
pub struct DecodeSession<'a, R: Read> {
    protocol: TCompactInputProtocol<TrackedReader<R>>,
    cursor: PositionHandle,
    tables: &'a SchemaTables,
    config: &'a AnalyzerConfig,
    base: u64,
    declared_end: u64,
    path: DecodePath,
    depth: usize,
    records: SessionRecords,
    failure: Option<DecodeFailure>,
}

impl<'a, R: Read> DecodeSession<'a, R> {
    /// `reader` must be positioned at absolute offset `base`. `declared_end`
    /// is where interrupted scopes are closed: the end of the enclosing
    /// structure if known, else the end of the readable region.
    pub fn new(reader: R, base: u64, declared_end: u64, tables: &'a SchemaTables, config: &'a AnalyzerConfig) -> Self {
        let (tracked, cursor) = TrackedReader::new(reader, base);
        DecodeSession {
            protocol: TCompactInputProtocol::new(tracked),
            cursor,
            tables,
            config,
            base,
            declared_end: declared_end.max(base),
            path: DecodePath::new(),
            depth: 0,
            records: SessionRecords::default(),
            failure: None,
        }
    }

    /// Decode one struct of type `struct_name` (unknown types decode with
    /// unnamed fields).
    pub fn decode_struct(mut self, struct_name: Option<&'static str>) -> DecodeOutput {
        let (root, end) = match self.read_struct(struct_name) {
            Ok(root) => (root, self.position()),
            Err(Interrupted(partial)) => (partial, self.declared_end),
        };
        let range = ByteRange::new(self.base, end.max(self.base));
        self.records.values.insert(DecodePath::new(), range);

        if self.config.debug {
            debug!(
                struct_name = struct_name.unwrap_or("?"),
                range = %range,
                records = self.records.record_count(),
                complete = self.failure.is_none(),
                "decoded struct"
            );
        }

        DecodeOutput {
            struct_name,
            range,
            root,
            window: self.cursor.window(),
            records: self.records,
            failure: self.failure,
        }
    }

    fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn fail(&mut self, offset: u64, scope: ScopeKind, message: impl Into<String>) {
        if self.failure.is_some() {
            return;
        }
        let failure = DecodeFailure {
            offset,
            path: self.path.clone(),
            scope,
            message: message.into(),
        };
        debug!(offset, path = %display_path(&failure.path), message = %failure.message, "decode failure");
        self.failure = Some(failure);
    }

    fn read_struct(&mut self, struct_name: Option<&'static str>) -> Step<DecodedStruct> {
        let start = self.position();
        let mut out = DecodedStruct::default();

        if self.depth >= MAX_NESTING_DEPTH {
            self.fail(start, ScopeKind::Value, format!("nesting deeper than {MAX_NESTING_DEPTH} levels"));
            return Err(Interrupted(out));
        }
        self.depth += 1;
        let result = self.read_struct_fields(struct_name, &mut out);
        self.depth -= 1;

        match result {
            Ok(()) => {
                out.complete = true;
                Ok(out)
            }
            Err(()) => Err(Interrupted(out)),
        }
    }

    fn read_struct_fields(&mut self, struct_name: Option<&'static str>, out: &mut DecodedStruct) -> std::result::Result<(), ()> {
        if let Err(e) = self.protocol.read_struct_begin() {
            let at = self.position();
            self.fail(at, ScopeKind::Struct, e.to_string());
            return Err(());
        }

        loop {
            let header_start = self.position();
            let ident = match self.protocol.read_field_begin() {
                Ok(ident) => ident,
                Err(e) => {
                    self.fail(header_start, ScopeKind::Struct, format!("invalid field header: {e}"));
                    return Err(());
                }
            };
            let header_range = ByteRange::new(header_start, self.position());

            if ident.field_type == TType::Stop {
                self.records.stops.insert(self.path.clone(), header_range);
                break;
            }

            let (id, wire_type) = match (ident.id, WireType::from_ttype(ident.field_type)) {
                (Some(id), Some(wire_type)) => (id, wire_type),
                _ => {
                    self.fail(
                        header_start,
                        ScopeKind::Struct,
                        format!("unsupported field type {:?}", ident.field_type),
                    );
                    return Err(());
                }
            };

            if out.fields.iter().any(|f| f.id == id) {
                self.fail(
                    header_start,
                    ScopeKind::Struct,
                    format!("field id {id} repeated in one struct (path collision)"),
                );
                return Err(());
            }

            let resolved = self.tables.resolve(struct_name, id, wire_type);
            self.path.push(PathStep::Field(id));

            let value_start = self.position();
            let (value, interrupted) = if wire_type == WireType::Bool {
                match self.protocol.read_bool() {
                    Ok(b) => (Some(DecodedValue::Bool(b)), false),
                    Err(e) => {
                        self.fail(value_start, ScopeKind::Value, e.to_string());
                        (None, true)
                    }
                }
            } else {
                let hint = if wire_type.is_container() {
                    resolved.element_type()
                } else {
                    resolved.value_type()
                };
                match self.read_value(wire_type, hint) {
                    Ok(v) => (v, false),
                    Err(Interrupted(partial)) => (partial, true),
                }
            };

            let value_range = if wire_type == WireType::Bool && !interrupted {
                header_range
            } else if interrupted {
                ByteRange::new(value_start, self.declared_end.max(value_start))
            } else {
                ByteRange::new(value_start, self.position())
            };

            let path = self.path.clone();
            if self.config.debug {
                debug!(
                    path = %display_path(&path),
                    name = resolved.name.unwrap_or("?"),
                    wire_type = %wire_type,
                    header = %header_range,
                    value = %value_range,
                    "field"
                );
            }
            self.records.values.insert(path.clone(), value_range);
            self.records.fields.insert(
                path.clone(),
                FieldRecord {
                    id,
                    name: resolved.name,
                    wire_type,
                    header_range,
                    value_range,
                    required: resolved.required,
                    path,
                },
            );
            self.path.pop();

            out.fields.push(DecodedField { id, wire_type, value });
            if interrupted {
                return Err(());
            }

            if let Err(e) = self.protocol.read_field_end() {
                let at = self.position();
                self.fail(at, ScopeKind::Struct, e.to_string());
                return Err(());
            }
        }

        if let Err(e) = self.protocol.read_struct_end() {
            let at = self.position();
            self.fail(at, ScopeKind::Struct, e.to_string());
            return Err(());
        }
        Ok(())
    }

    /// Read one value at the current path. Field values record their range
    /// through the field record; container elements record it here.
    fn read_value(&mut self, wire_type: WireType, hint: Option<ValueType>) -> Step<Option<DecodedValue>> {
        let start = self.position();
        match wire_type {
            WireType::Struct => {
                let name = hint.and_then(|h| h.struct_name());
                match self.read_struct(name) {
                    Ok(s) => Ok(Some(DecodedValue::Struct(s))),
                    Err(Interrupted(partial)) => Err(Interrupted(Some(DecodedValue::Struct(partial)))),
                }
            }
            WireType::List | WireType::Set => self.read_list(wire_type, hint),
            WireType::Map => self.read_map(),
            scalar => match self.read_scalar(scalar) {
                Ok(v) => Ok(Some(v)),
                Err(e) => {
                    self.fail(start, ScopeKind::Value, e.to_string());
                    Err(Interrupted(None))
                }
            },
        }
    }

    fn read_scalar(&mut self, wire_type: WireType) -> thrift::Result<DecodedValue> {
        Ok(match wire_type {
            WireType::Bool => DecodedValue::Bool(self.protocol.read_bool()?),
            WireType::I8 => DecodedValue::I8(self.protocol.read_i8()?),
            WireType::I16 => DecodedValue::I16(self.protocol.read_i16()?),
            WireType::I32 => DecodedValue::I32(self.protocol.read_i32()?),
            WireType::I64 => DecodedValue::I64(self.protocol.read_i64()?),
            WireType::Double => DecodedValue::Double(self.protocol.read_double()?),
            WireType::Binary => DecodedValue::Binary(self.read_binary()?),
            composite => {
                return Err(thrift::Error::Protocol(thrift::ProtocolError::new(
                    thrift::ProtocolErrorKind::InvalidData,
                    format!("{composite} is not a scalar"),
                )))
            }
        })
    }

    /// Binary length prefix is an unsigned varint; `read_i32` consumes the
    /// same bytes and zigzag-decodes them, so the raw length is recovered by
    /// re-encoding. The length is checked against the readable region before
    /// any buffer is allocated.
    fn read_binary(&mut self) -> thrift::Result<Bytes> {
        let zigzag = i64::from(self.protocol.read_i32()?);
        let len = ((zigzag << 1) ^ (zigzag >> 63)) as u64;
        let available = self.declared_end.saturating_sub(self.position());
        if len > available {
            return Err(thrift::Error::Protocol(thrift::ProtocolError::new(
                thrift::ProtocolErrorKind::SizeLimit,
                format!("binary length {len} exceeds the {available} bytes left"),
            )));
        }
        let mut buf = Vec::with_capacity(len as usize);
        for _ in 0..len {
            buf.push(self.protocol.read_byte()?);
        }
        Ok(Bytes::from(buf))
    }

    fn container_count(&mut self, start: u64, size: i32) -> Option<u32> {
        match u32::try_from(size) {
            Ok(count) => Some(count),
            Err(_) => {
                self.fail(start, ScopeKind::Value, format!("negative element count {size}"));
                None
            }
        }
    }

    fn read_list(&mut self, wire_type: WireType, element_hint: Option<ValueType>) -> Step<Option<DecodedValue>> {
        let start = self.position();
        let header = if wire_type == WireType::Set {
            self.protocol.read_set_begin().map(|s| (s.element_type, s.size))
        } else {
            self.protocol.read_list_begin().map(|l| (l.element_type, l.size))
        };
        let (element_ttype, size) = match header {
            Ok(header) => header,
            Err(e) => {
                self.fail(start, ScopeKind::Value, format!("invalid {wire_type} header: {e}"));
                return Err(Interrupted(None));
            }
        };
        let header_range = ByteRange::new(start, self.position());

        let element_type = match WireType::from_ttype(element_ttype) {
            Some(t) => t,
            None => {
                self.fail(start, ScopeKind::Value, format!("unsupported element type {element_ttype:?}"));
                return Err(Interrupted(None));
            }
        };
        let Some(count) = self.container_count(start, size) else {
            return Err(Interrupted(None));
        };

        if self.config.debug {
            debug!(
                path = %display_path(&self.path),
                element_type = %element_type,
                count,
                header = %header_range,
                "container header"
            );
        }
        self.records.containers.insert(
            self.path.clone(),
            ListHeaderRecord {
                kind: wire_type,
                element_type: Some(element_type),
                key_type: None,
                count,
                header_range,
                path: self.path.clone(),
            },
        );

        let element_hint = element_hint.filter(|h| h.wire_type() == element_type);
        let mut list = DecodedList {
            wire_type,
            element_type,
            declared_count: count,
            items: Vec::new(),
            complete: false,
        };

        for i in 0..count {
            match self.read_element(PathStep::Element(i), element_type, element_hint) {
                Ok(v) => list.items.push(v),
                Err(partial) => {
                    list.items.extend(partial);
                    return Err(Interrupted(Some(DecodedValue::List(list))));
                }
            }
        }

        let end_result = if wire_type == WireType::Set {
            self.protocol.read_set_end()
        } else {
            self.protocol.read_list_end()
        };
        if let Err(e) = end_result {
            let at = self.position();
            self.fail(at, ScopeKind::Value, e.to_string());
            return Err(Interrupted(Some(DecodedValue::List(list))));
        }
        list.complete = true;
        Ok(Some(DecodedValue::List(list)))
    }

    fn read_map(&mut self) -> Step<Option<DecodedValue>> {
        let start = self.position();
        let header = match self.protocol.read_map_begin() {
            Ok(header) => header,
            Err(e) => {
                self.fail(start, ScopeKind::Value, format!("invalid map header: {e}"));
                return Err(Interrupted(None));
            }
        };
        let header_range = ByteRange::new(start, self.position());
        let Some(count) = self.container_count(start, header.size) else {
            return Err(Interrupted(None));
        };
        let key_wire = header.key_type.and_then(WireType::from_ttype);
        let value_wire = header.value_type.and_then(WireType::from_ttype);

        self.records.containers.insert(
            self.path.clone(),
            ListHeaderRecord {
                kind: WireType::Map,
                element_type: value_wire,
                key_type: key_wire,
                count,
                header_range,
                path: self.path.clone(),
            },
        );

        let mut map = DecodedMap {
            key_type: key_wire,
            value_type: value_wire,
            declared_count: count,
            entries: Vec::new(),
            complete: false,
        };
        if count == 0 {
            map.complete = true;
            return Ok(Some(DecodedValue::Map(map)));
        }
        let (key_type, value_type) = match (key_wire, value_wire) {
            (Some(k), Some(v)) => (k, v),
            _ => {
                self.fail(start, ScopeKind::Value, "map entries with unsupported key or value type");
                return Err(Interrupted(None));
            }
        };

        for i in 0..count {
            let key = match self.read_element(PathStep::Key(i), key_type, None) {
                Ok(k) => k,
                Err(partial) => {
                    if let Some(k) = partial {
                        map.entries.push((k, None));
                    }
                    return Err(Interrupted(Some(DecodedValue::Map(map))));
                }
            };
            match self.read_element(PathStep::Value(i), value_type, None) {
                Ok(v) => map.entries.push((key, Some(v))),
                Err(partial) => {
                    map.entries.push((key, partial));
                    return Err(Interrupted(Some(DecodedValue::Map(map))));
                }
            }
        }

        if let Err(e) = self.protocol.read_map_end() {
            let at = self.position();
            self.fail(at, ScopeKind::Value, e.to_string());
            return Err(Interrupted(Some(DecodedValue::Map(map))));
        }
        map.complete = true;
        Ok(Some(DecodedValue::Map(map)))
    }

    /// Read one container element under `step`, recording its range.
    fn read_element(
        &mut self,
        step: PathStep,
        wire_type: WireType,
        hint: Option<ValueType>,
    ) -> std::result::Result<DecodedValue, Option<DecodedValue>> {
        self.path.push(step);
        let start = self.position();
        let result = self.read_value(wire_type, hint);
        let range = match &result {
            Ok(_) => ByteRange::new(start, self.position()),
            Err(_) => ByteRange::new(start, self.declared_end.max(start)),
        };
        self.records.values.insert(self.path.clone(), range);
        self.path.pop();

        match result {
            Ok(Some(v)) => Ok(v),
            // A value read never succeeds without producing a value.
            Ok(None) => Err(None),
            Err(Interrupted(partial)) => Err(partial),
        }
    }
}

/// Decode a struct from an in-memory buffer starting at absolute `base`.
pub fn decode_buffer(
    bytes: &[u8],
    base: u64,
    struct_name: Option<&'static str>,
    tables: &SchemaTables,
    config: &AnalyzerConfig,
) -> DecodeOutput {
    let end = base + bytes.len() as u64;
    DecodeSession::new(bytes, base, end, tables, config).decode_struct(struct_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn decode(bytes: &[u8], base: u64, name: Option<&'static str>) -> DecodeOutput {
        decode_buffer(bytes, base, name, SchemaTables::parquet(), &AnalyzerConfig::default())
    }

    #[test]
    fn test_field_and_stop_offsets() {
        // field 1 i32 = 1 (zigzag 2), field 3 i64 = 150 (zigzag 300), stop
        let bytes = [0x15, 0x02, 0x26, 0xAC, 0x02, 0x00];
        let out = decode(&bytes, 100, Some("FileMetaData"));
        assert!(out.is_complete());
        assert_eq!(out.range, ByteRange::new(100, 106));

        let version = out.records.field(&[PathStep::Field(1)]).unwrap();
        assert_eq!(version.name, Some("version"));
        assert!(version.required);
        assert_eq!(version.header_range, ByteRange::new(100, 101));
        assert_eq!(version.value_range, ByteRange::new(101, 102));

        let rows = out.records.field(&[PathStep::Field(3)]).unwrap();
        assert_eq!(rows.name, Some("num_rows"));
        assert_eq!(rows.value_range, ByteRange::new(103, 105));
        assert_eq!(out.root.i64_field(3), Some(150));

        assert_eq!(out.records.stop(&[]), Some(ByteRange::new(105, 106)));
    }

    #[test]
    fn test_long_form_field_header() {
        // delta 0 form: type byte then zigzag id 20 (40 = 0x28)
        let bytes = [0x05, 0x28, 0x04, 0x00];
        let out = decode(&bytes, 0, None);
        assert!(out.is_complete());
        let record = out.records.field(&[PathStep::Field(20)]).unwrap();
        assert_eq!(record.header_range, ByteRange::new(0, 2));
        assert_eq!(record.value_range, ByteRange::new(2, 3));
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_bool_packed_in_header() {
        // field 1 bool true (type 1), field 2 bool false (type 2)
        let bytes = [0x11, 0x12, 0x00];
        let out = decode(&bytes, 10, None);
        let a = out.records.field(&[PathStep::Field(1)]).unwrap();
        assert!(a.is_packed());
        assert_eq!(a.value_range, ByteRange::new(10, 11));
        assert_eq!(out.root.bool_field(1), Some(true));
        assert_eq!(out.root.bool_field(2), Some(false));
    }

    #[test]
    fn test_short_and_extended_list_headers() {
        let mut bytes = vec![0x19, 0xE3];
        bytes.extend(std::iter::repeat(7u8).take(14));
        bytes.extend([0x19, 0xF3, 0x0F]);
        bytes.extend(std::iter::repeat(9u8).take(15));
        bytes.push(0x00);
        let out = decode(&bytes, 0, None);
        assert!(out.is_complete());

        let short = out.records.container(&[PathStep::Field(1)]).unwrap();
        assert_eq!(short.count, 14);
        assert_eq!(short.header_range, ByteRange::new(1, 2));

        let long = out.records.container(&[PathStep::Field(2)]).unwrap();
        assert_eq!(long.count, 15);
        assert_eq!(long.header_range, ByteRange::new(17, 19));
        assert_eq!(long.element_type, Some(WireType::I8));

        let first = out.records.value_range(&[PathStep::Field(2), PathStep::Element(0)]);
        assert_eq!(first, Some(ByteRange::new(19, 20)));
    }

    #[test]
    fn test_empty_list_header_recorded() {
        let bytes = [0x19, 0x0C, 0x00];
        let out = decode(&bytes, 0, None);
        let header = out.records.container(&[PathStep::Field(1)]).unwrap();
        assert_eq!(header.count, 0);
        assert_eq!(header.element_type, Some(WireType::Struct));
        assert_eq!(header.header_range, ByteRange::new(1, 2));
    }

    #[test]
    fn test_truncated_value_fails_at_value_scope() {
        // field 1 binary of length 10 with only 2 bytes present
        let bytes = [0x18, 0x0A, b'a', b'b'];
        let out = decode(&bytes, 50, None);
        let failure = out.failure.clone().unwrap();
        assert_eq!(failure.scope, ScopeKind::Value);
        assert_eq!(failure.offset, 51);
        let path: DecodePath = smallvec![PathStep::Field(1)];
        assert_eq!(failure.path, path);
        assert_eq!(out.range, ByteRange::new(50, 54));

        let record = out.records.field(&[PathStep::Field(1)]).unwrap();
        assert_eq!(record.value_range, ByteRange::new(51, 54));
        assert!(out.into_result().is_err());
    }

    #[test]
    fn test_oversized_binary_length_is_rejected() {
        // field 1 binary declaring 0xFFFFFFFF bytes
        let bytes = [0x18, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, b'x', 0x00];
        let out = decode(&bytes, 0, None);
        let failure = out.failure.clone().unwrap();
        assert_eq!(failure.scope, ScopeKind::Value);
        assert_eq!(failure.offset, 1);
        assert!(failure.message.contains("4294967295"), "{}", failure.message);
        assert_eq!(out.range, ByteRange::new(0, 8));
    }

    #[test]
    fn test_binary_values_decode() {
        // field 1 binary "abc", field 2 empty binary, stop
        let bytes = [0x18, 0x03, b'a', b'b', b'c', 0x18, 0x00, 0x00];
        let out = decode(&bytes, 0, None);
        assert!(out.is_complete());
        assert_eq!(out.root.str_field(1), Some("abc"));
        assert_eq!(out.root.str_field(2), Some(""));
        let record = out.records.field(&[PathStep::Field(1)]).unwrap();
        assert_eq!(record.value_range, ByteRange::new(1, 5));
    }

    #[test]
    fn test_invalid_field_type_fails_at_struct_scope() {
        // field 1 i32, then a header with type nibble 0x0F
        let bytes = [0x15, 0x02, 0x1F, 0x00];
        let out = decode(&bytes, 0, None);
        let failure = out.failure.clone().unwrap();
        assert_eq!(failure.scope, ScopeKind::Struct);
        assert_eq!(failure.offset, 2);
        assert!(failure.path.is_empty());
        assert_eq!(out.root.fields.len(), 1);
        assert!(!out.root.complete);
    }

    #[test]
    fn test_duplicate_field_id_is_collision() {
        let bytes = [0x15, 0x02, 0x05, 0x02, 0x04, 0x00];
        let out = decode(&bytes, 0, None);
        let failure = out.failure.unwrap();
        assert_eq!(failure.offset, 2);
        assert!(failure.message.contains("collision"));
    }

    #[test]
    fn test_nested_struct_paths() {
        // field 1 struct { field 1 i32 = 3, stop }, field 2 struct { field 1 i32 = 4, stop }, stop
        let bytes = [0x1C, 0x15, 0x06, 0x00, 0x1C, 0x15, 0x08, 0x00, 0x00];
        let out = decode(&bytes, 0, None);
        assert!(out.is_complete());
        let a = out.records.field(&[PathStep::Field(1), PathStep::Field(1)]).unwrap();
        let b = out.records.field(&[PathStep::Field(2), PathStep::Field(1)]).unwrap();
        assert_eq!(a.value_range, ByteRange::new(2, 3));
        assert_eq!(b.value_range, ByteRange::new(6, 7));
        assert_eq!(out.records.stop(&[PathStep::Field(1)]), Some(ByteRange::new(3, 4)));
        assert_eq!(out.records.stop(&[]), Some(ByteRange::new(8, 9)));
    }

    #[test]
    fn test_map_records() {
        // field 1 map<i8, i8> with 1 entry
        let bytes = [0x1B, 0x01, 0x33, 0x05, 0x06, 0x00];
        let out = decode(&bytes, 0, None);
        assert!(out.is_complete());
        let header = out.records.container(&[PathStep::Field(1)]).unwrap();
        assert_eq!(header.kind, WireType::Map);
        assert_eq!(header.header_range, ByteRange::new(1, 3));
        assert_eq!(header.key_type, Some(WireType::I8));
        assert_eq!(
            out.records.value_range(&[PathStep::Field(1), PathStep::Value(0)]),
            Some(ByteRange::new(4, 5))
        );
    }
}
