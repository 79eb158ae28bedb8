// src/protocol/mod.rs
//! Offset-tracking decode of compact-protocol structs.

pub mod records;
pub mod session;
pub mod tracked_reader;
pub mod value;

pub use records::{display_path, DecodePath, COMPACT_SHORT_LIST_MAX, FieldRecord, FramingKind, ListHeaderRecord, PathStep, SessionRecords};
pub use session::{decode_buffer, DecodeFailure, DecodeOutput, DecodeSession, ScopeKind, MAX_NESTING_DEPTH};
pub use tracked_reader::{ByteWindow, PositionHandle, TrackedReader};
pub use value::{DecodedField, DecodedList, DecodedMap, DecodedStruct, DecodedValue};
