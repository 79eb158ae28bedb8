// src/schema/mod.rs
//! Static lookup tables describing the metadata structs: struct name and
//! field id to field name, wire type, requiredness and element type.

mod enums;
mod tables;

pub use enums::{resolve_enum_name, EnumKind};
pub use tables::PARQUET_STRUCTS;

use crate::error::{LensError, Result};
use crate::types::WireType;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Logical type of a value, finer than its wire type: it separates text from
/// raw bytes, names enums, and names the struct type of nested structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    Binary,
    String,
    Enum(EnumKind),
    Struct(&'static str),
}

impl ValueType {
    pub fn wire_type(&self) -> WireType {
        match self {
            ValueType::Bool => WireType::Bool,
            ValueType::I8 => WireType::I8,
            ValueType::I16 => WireType::I16,
            ValueType::I32 | ValueType::Enum(_) => WireType::I32,
            ValueType::I64 => WireType::I64,
            ValueType::Double => WireType::Double,
            ValueType::Binary | ValueType::String => WireType::Binary,
            ValueType::Struct(_) => WireType::Struct,
        }
    }

    pub fn struct_name(&self) -> Option<&'static str> {
        match self {
            ValueType::Struct(name) => Some(*name),
            _ => None,
        }
    }

    pub fn enum_kind(&self) -> Option<EnumKind> {
        match self {
            ValueType::Enum(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ValueType::String => "string".to_string(),
            ValueType::Enum(kind) => kind.name().to_string(),
            ValueType::Struct(name) => name.to_string(),
            other => other.wire_type().name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Set,
}

impl ContainerKind {
    pub fn wire_type(&self) -> WireType {
        match self {
            ContainerKind::List => WireType::List,
            ContainerKind::Set => WireType::Set,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requiredness {
    Required,
    Optional,
}

/// Field descriptor as written in the tables. Plain fields and container
/// fields have different shapes; both are normalized into [`FieldSpec`].
#[derive(Debug, Clone, Copy)]
pub enum RawField {
    Plain(i16, &'static str, ValueType, Requiredness),
    Nested(i16, &'static str, ContainerKind, Requiredness, ValueType),
}

#[derive(Debug, Clone, Copy)]
pub struct RawStruct {
    pub name: &'static str,
    pub is_union: bool,
    pub fields: &'static [RawField],
}

/// Normalized field descriptor. Downstream code matches on the tag only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSpec {
    Primitive {
        name: &'static str,
        value_type: ValueType,
        required: bool,
    },
    Container {
        name: &'static str,
        container: ContainerKind,
        required: bool,
        element: ValueType,
    },
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        match self {
            FieldSpec::Primitive { name, .. } | FieldSpec::Container { name, .. } => *name,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            FieldSpec::Primitive { required, .. } | FieldSpec::Container { required, .. } => *required,
        }
    }

    pub fn wire_type(&self) -> WireType {
        match self {
            FieldSpec::Primitive { value_type, .. } => value_type.wire_type(),
            FieldSpec::Container { container, .. } => container.wire_type(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldSpec::Primitive { value_type, .. } => value_type.describe(),
            FieldSpec::Container { container, element, .. } => {
                format!("{}<{}>", container.wire_type().name(), element.describe())
            }
        }
    }
}

impl RawField {
    pub fn normalize(&self) -> (i16, FieldSpec) {
        match *self {
            RawField::Plain(id, name, value_type, req) => (
                id,
                FieldSpec::Primitive {
                    name,
                    value_type,
                    required: req == Requiredness::Required,
                },
            ),
            RawField::Nested(id, name, container, req, element) => (
                id,
                FieldSpec::Container {
                    name,
                    container,
                    required: req == Requiredness::Required,
                    element,
                },
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: &'static str,
    pub is_union: bool,
    fields: Vec<(i16, FieldSpec)>,
}

impl StructDef {
    pub fn field(&self, id: i16) -> Option<&FieldSpec> {
        self.fields
            .binary_search_by_key(&id, |(field_id, _)| *field_id)
            .ok()
            .map(|idx| &self.fields[idx].1)
    }

    /// Fields in declaration (id) order.
    pub fn fields(&self) -> impl Iterator<Item = (i16, &FieldSpec)> {
        self.fields.iter().map(|(id, spec)| (*id, spec))
    }
}

/// Result of looking a wire field up in the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: Option<&'static str>,
    pub wire_type: WireType,
    pub required: bool,
    pub spec: Option<FieldSpec>,
}

impl ResolvedField {
    /// True when the tables know the field but declare a different wire type.
    pub fn is_mismatched(&self) -> bool {
        self.spec.map(|s| s.wire_type() != self.wire_type).unwrap_or(false)
    }

    /// Logical type of the field value, only when it agrees with the wire.
    pub fn value_type(&self) -> Option<ValueType> {
        match self.spec {
            Some(FieldSpec::Primitive { value_type, .. }) if !self.is_mismatched() => Some(value_type),
            _ => None,
        }
    }

    /// Logical type of the container elements, only when it agrees with the wire.
    pub fn element_type(&self) -> Option<ValueType> {
        match self.spec {
            Some(FieldSpec::Container { element, .. }) if !self.is_mismatched() => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaTables {
    structs: HashMap<&'static str, StructDef>,
}

impl SchemaTables {
    /// Build tables from raw descriptors, normalizing every field shape.
    pub fn from_raw(raw: &[RawStruct]) -> Self {
        let structs = raw
            .iter()
            .map(|def| {
                let mut fields: Vec<(i16, FieldSpec)> = def.fields.iter().map(RawField::normalize).collect();
                fields.sort_by_key(|(id, _)| *id);
                (
                    def.name,
                    StructDef {
                        name: def.name,
                        is_union: def.is_union,
                        fields,
                    },
                )
            })
            .collect();
        SchemaTables { structs }
    }

    /// Tables for the parquet-format metadata structs.
    pub fn parquet() -> &'static SchemaTables {
        static TABLES: OnceLock<SchemaTables> = OnceLock::new();
        TABLES.get_or_init(|| SchemaTables::from_raw(PARQUET_STRUCTS))
    }

    pub fn get(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&StructDef> {
        self.get(name).ok_or_else(|| LensError::UnknownStruct(name.to_string()))
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    /// Resolve a field as seen on the wire. Unknown structs and unknown ids
    /// resolve to an unnamed optional field with the raw wire type.
    pub fn resolve(&self, struct_name: Option<&str>, field_id: i16, wire_type: WireType) -> ResolvedField {
        let spec = struct_name
            .and_then(|name| self.get(name))
            .and_then(|def| def.field(field_id))
            .copied();
        match spec {
            Some(spec) => ResolvedField {
                name: Some(spec.name()),
                wire_type,
                required: spec.required(),
                spec: Some(spec),
            },
            None => ResolvedField {
                name: None,
                wire_type,
                required: false,
                spec: None,
            },
        }
    }

    /// Check that every struct referenced by a field is itself defined.
    pub fn validate(&self) -> Result<()> {
        for def in self.structs.values() {
            for (_, spec) in def.fields() {
                let referenced = match spec {
                    FieldSpec::Primitive { value_type, .. } => value_type.struct_name(),
                    FieldSpec::Container { element, .. } => element.struct_name(),
                };
                if let Some(name) = referenced {
                    self.require(name)?;
                }
            }
        }
        Ok(())
    }
}
