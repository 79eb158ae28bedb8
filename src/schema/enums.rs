// src/schema/enums.rs

/// Enumerations referenced by the parquet metadata structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Type,
    ConvertedType,
    FieldRepetitionType,
    Encoding,
    CompressionCodec,
    PageType,
    BoundaryOrder,
    EdgeInterpolationAlgorithm,
}

const TYPE: &[(i64, &str)] = &[
    (0, "BOOLEAN"),
    (1, "INT32"),
    (2, "INT64"),
    (3, "INT96"),
    (4, "FLOAT"),
    (5, "DOUBLE"),
    (6, "BYTE_ARRAY"),
    (7, "FIXED_LEN_BYTE_ARRAY"),
];

const CONVERTED_TYPE: &[(i64, &str)] = &[
    (0, "UTF8"),
    (1, "MAP"),
    (2, "MAP_KEY_VALUE"),
    (3, "LIST"),
    (4, "ENUM"),
    (5, "DECIMAL"),
    (6, "DATE"),
    (7, "TIME_MILLIS"),
    (8, "TIME_MICROS"),
    (9, "TIMESTAMP_MILLIS"),
    (10, "TIMESTAMP_MICROS"),
    (11, "UINT_8"),
    (12, "UINT_16"),
    (13, "UINT_32"),
    (14, "UINT_64"),
    (15, "INT_8"),
    (16, "INT_16"),
    (17, "INT_32"),
    (18, "INT_64"),
    (19, "JSON"),
    (20, "BSON"),
    (21, "INTERVAL"),
];

const FIELD_REPETITION_TYPE: &[(i64, &str)] = &[(0, "REQUIRED"), (1, "OPTIONAL"), (2, "REPEATED")];

// 1 was GROUP_VAR_INT and was never used.
const ENCODING: &[(i64, &str)] = &[
    (0, "PLAIN"),
    (2, "PLAIN_DICTIONARY"),
    (3, "RLE"),
    (4, "BIT_PACKED"),
    (5, "DELTA_BINARY_PACKED"),
    (6, "DELTA_LENGTH_BYTE_ARRAY"),
    (7, "DELTA_BYTE_ARRAY"),
    (8, "RLE_DICTIONARY"),
    (9, "BYTE_STREAM_SPLIT"),
];

const COMPRESSION_CODEC: &[(i64, &str)] = &[
    (0, "UNCOMPRESSED"),
    (1, "SNAPPY"),
    (2, "GZIP"),
    (3, "LZO"),
    (4, "BROTLI"),
    (5, "LZ4"),
    (6, "ZSTD"),
    (7, "LZ4_RAW"),
];

const PAGE_TYPE: &[(i64, &str)] = &[
    (0, "DATA_PAGE"),
    (1, "INDEX_PAGE"),
    (2, "DICTIONARY_PAGE"),
    (3, "DATA_PAGE_V2"),
];

const BOUNDARY_ORDER: &[(i64, &str)] = &[(0, "UNORDERED"), (1, "ASCENDING"), (2, "DESCENDING")];

const EDGE_INTERPOLATION_ALGORITHM: &[(i64, &str)] = &[
    (0, "SPHERICAL"),
    (1, "VINCENTY"),
    (2, "THOMAS"),
    (3, "ANDOYER"),
    (4, "KARNEY"),
];

impl EnumKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnumKind::Type => "Type",
            EnumKind::ConvertedType => "ConvertedType",
            EnumKind::FieldRepetitionType => "FieldRepetitionType",
            EnumKind::Encoding => "Encoding",
            EnumKind::CompressionCodec => "CompressionCodec",
            EnumKind::PageType => "PageType",
            EnumKind::BoundaryOrder => "BoundaryOrder",
            EnumKind::EdgeInterpolationAlgorithm => "EdgeInterpolationAlgorithm",
        }
    }

    pub fn table(&self) -> &'static [(i64, &'static str)] {
        match self {
            EnumKind::Type => TYPE,
            EnumKind::ConvertedType => CONVERTED_TYPE,
            EnumKind::FieldRepetitionType => FIELD_REPETITION_TYPE,
            EnumKind::Encoding => ENCODING,
            EnumKind::CompressionCodec => COMPRESSION_CODEC,
            EnumKind::PageType => PAGE_TYPE,
            EnumKind::BoundaryOrder => BOUNDARY_ORDER,
            EnumKind::EdgeInterpolationAlgorithm => EDGE_INTERPOLATION_ALGORITHM,
        }
    }
}

/// Single resolution point for enum values wherever enum segments are built.
pub fn resolve_enum_name(kind: EnumKind, raw: i64) -> Option<&'static str> {
    kind.table()
        .iter()
        .find(|(value, _)| *value == raw)
        .map(|(_, name)| *name)
}
