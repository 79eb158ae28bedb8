// src/schema/tables.rs
use super::ContainerKind::List;
use super::EnumKind as E;
use super::RawField::{Nested, Plain};
use super::Requiredness::{Optional as OPT, Required as REQ};
use super::ValueType::{Binary, Bool, Double, Enum, Struct, I16, I32, I64, I8};
use super::{RawStruct, ValueType};

const TEXT: ValueType = ValueType::String;

macro_rules! def {
    ($name:literal, $fields:expr $(,)?) => {
        RawStruct { name: $name, is_union: false, fields: $fields }
    };
}

macro_rules! one_of {
    ($name:literal, $fields:expr $(,)?) => {
        RawStruct { name: $name, is_union: true, fields: $fields }
    };
}

/// parquet-format metadata structs, footer and page-level.
pub static PARQUET_STRUCTS: &[RawStruct] = &[
    def!(
        "FileMetaData",
        &[
            Plain(1, "version", I32, REQ),
            Nested(2, "schema", List, REQ, Struct("SchemaElement")),
            Plain(3, "num_rows", I64, REQ),
            Nested(4, "row_groups", List, REQ, Struct("RowGroup")),
            Nested(5, "key_value_metadata", List, OPT, Struct("KeyValue")),
            Plain(6, "created_by", TEXT, OPT),
            Nested(7, "column_orders", List, OPT, Struct("ColumnOrder")),
            Plain(8, "encryption_algorithm", Struct("EncryptionAlgorithm"), OPT),
            Plain(9, "footer_signing_key_metadata", Binary, OPT),
        ],
    ),
    def!(
        "SchemaElement",
        &[
            Plain(1, "type", Enum(E::Type), OPT),
            Plain(2, "type_length", I32, OPT),
            Plain(3, "repetition_type", Enum(E::FieldRepetitionType), OPT),
            Plain(4, "name", TEXT, REQ),
            Plain(5, "num_children", I32, OPT),
            Plain(6, "converted_type", Enum(E::ConvertedType), OPT),
            Plain(7, "scale", I32, OPT),
            Plain(8, "precision", I32, OPT),
            Plain(9, "field_id", I32, OPT),
            Plain(10, "logicalType", Struct("LogicalType"), OPT),
        ],
    ),
    def!(
        "RowGroup",
        &[
            Nested(1, "columns", List, REQ, Struct("ColumnChunk")),
            Plain(2, "total_byte_size", I64, REQ),
            Plain(3, "num_rows", I64, REQ),
            Nested(4, "sorting_columns", List, OPT, Struct("SortingColumn")),
            Plain(5, "file_offset", I64, OPT),
            Plain(6, "total_compressed_size", I64, OPT),
            Plain(7, "ordinal", I16, OPT),
        ],
    ),
    def!(
        "ColumnChunk",
        &[
            Plain(1, "file_path", TEXT, OPT),
            Plain(2, "file_offset", I64, REQ),
            Plain(3, "meta_data", Struct("ColumnMetaData"), OPT),
            Plain(4, "offset_index_offset", I64, OPT),
            Plain(5, "offset_index_length", I32, OPT),
            Plain(6, "column_index_offset", I64, OPT),
            Plain(7, "column_index_length", I32, OPT),
            Plain(8, "crypto_metadata", Struct("ColumnCryptoMetaData"), OPT),
            Plain(9, "encrypted_column_metadata", Binary, OPT),
        ],
    ),
    def!(
        "ColumnMetaData",
        &[
            Plain(1, "type", Enum(E::Type), REQ),
            Nested(2, "encodings", List, REQ, Enum(E::Encoding)),
            Nested(3, "path_in_schema", List, REQ, TEXT),
            Plain(4, "codec", Enum(E::CompressionCodec), REQ),
            Plain(5, "num_values", I64, REQ),
            Plain(6, "total_uncompressed_size", I64, REQ),
            Plain(7, "total_compressed_size", I64, REQ),
            Nested(8, "key_value_metadata", List, OPT, Struct("KeyValue")),
            Plain(9, "data_page_offset", I64, REQ),
            Plain(10, "index_page_offset", I64, OPT),
            Plain(11, "dictionary_page_offset", I64, OPT),
            Plain(12, "statistics", Struct("Statistics"), OPT),
            Nested(13, "encoding_stats", List, OPT, Struct("PageEncodingStats")),
            Plain(14, "bloom_filter_offset", I64, OPT),
            Plain(15, "bloom_filter_length", I32, OPT),
            Plain(16, "size_statistics", Struct("SizeStatistics"), OPT),
            Plain(17, "geospatial_statistics", Struct("GeospatialStatistics"), OPT),
        ],
    ),
    def!(
        "KeyValue",
        &[Plain(1, "key", TEXT, REQ), Plain(2, "value", TEXT, OPT)],
    ),
    def!(
        "Statistics",
        &[
            Plain(1, "max", Binary, OPT),
            Plain(2, "min", Binary, OPT),
            Plain(3, "null_count", I64, OPT),
            Plain(4, "distinct_count", I64, OPT),
            Plain(5, "max_value", Binary, OPT),
            Plain(6, "min_value", Binary, OPT),
            Plain(7, "is_max_value_exact", Bool, OPT),
            Plain(8, "is_min_value_exact", Bool, OPT),
        ],
    ),
    def!(
        "SizeStatistics",
        &[
            Plain(1, "unencoded_byte_array_data_bytes", I64, OPT),
            Nested(2, "repetition_level_histogram", List, OPT, I64),
            Nested(3, "definition_level_histogram", List, OPT, I64),
        ],
    ),
    def!(
        "BoundingBox",
        &[
            Plain(1, "xmin", Double, REQ),
            Plain(2, "xmax", Double, REQ),
            Plain(3, "ymin", Double, REQ),
            Plain(4, "ymax", Double, REQ),
            Plain(5, "zmin", Double, OPT),
            Plain(6, "zmax", Double, OPT),
            Plain(7, "mmin", Double, OPT),
            Plain(8, "mmax", Double, OPT),
        ],
    ),
    def!(
        "GeospatialStatistics",
        &[
            Plain(1, "bbox", Struct("BoundingBox"), OPT),
            Nested(2, "geospatial_types", List, OPT, I32),
        ],
    ),
    def!(
        "PageEncodingStats",
        &[
            Plain(1, "page_type", Enum(E::PageType), REQ),
            Plain(2, "encoding", Enum(E::Encoding), REQ),
            Plain(3, "count", I32, REQ),
        ],
    ),
    def!(
        "SortingColumn",
        &[
            Plain(1, "column_idx", I32, REQ),
            Plain(2, "descending", Bool, REQ),
            Plain(3, "nulls_first", Bool, REQ),
        ],
    ),
    def!("TypeDefinedOrder", &[]),
    one_of!("ColumnOrder", &[Plain(1, "TYPE_ORDER", Struct("TypeDefinedOrder"), OPT)]),
    def!("StringType", &[]),
    def!("UUIDType", &[]),
    def!("MapType", &[]),
    def!("ListType", &[]),
    def!("EnumType", &[]),
    def!("DateType", &[]),
    def!("Float16Type", &[]),
    def!("NullType", &[]),
    def!("JsonType", &[]),
    def!("BsonType", &[]),
    def!("MilliSeconds", &[]),
    def!("MicroSeconds", &[]),
    def!("NanoSeconds", &[]),
    def!(
        "DecimalType",
        &[Plain(1, "scale", I32, REQ), Plain(2, "precision", I32, REQ)],
    ),
    one_of!(
        "TimeUnit",
        &[
            Plain(1, "MILLIS", Struct("MilliSeconds"), OPT),
            Plain(2, "MICROS", Struct("MicroSeconds"), OPT),
            Plain(3, "NANOS", Struct("NanoSeconds"), OPT),
        ],
    ),
    def!(
        "TimestampType",
        &[
            Plain(1, "isAdjustedToUTC", Bool, REQ),
            Plain(2, "unit", Struct("TimeUnit"), REQ),
        ],
    ),
    def!(
        "TimeType",
        &[
            Plain(1, "isAdjustedToUTC", Bool, REQ),
            Plain(2, "unit", Struct("TimeUnit"), REQ),
        ],
    ),
    def!(
        "IntType",
        &[Plain(1, "bitWidth", I8, REQ), Plain(2, "isSigned", Bool, REQ)],
    ),
    def!("VariantType", &[Plain(1, "specification_version", I8, OPT)]),
    def!("GeometryType", &[Plain(1, "crs", TEXT, OPT)]),
    def!(
        "GeographyType",
        &[
            Plain(1, "crs", TEXT, OPT),
            Plain(2, "algorithm", Enum(E::EdgeInterpolationAlgorithm), OPT),
        ],
    ),
    one_of!(
        "LogicalType",
        &[
            Plain(1, "STRING", Struct("StringType"), OPT),
            Plain(2, "MAP", Struct("MapType"), OPT),
            Plain(3, "LIST", Struct("ListType"), OPT),
            Plain(4, "ENUM", Struct("EnumType"), OPT),
            Plain(5, "DECIMAL", Struct("DecimalType"), OPT),
            Plain(6, "DATE", Struct("DateType"), OPT),
            Plain(7, "TIME", Struct("TimeType"), OPT),
            Plain(8, "TIMESTAMP", Struct("TimestampType"), OPT),
            Plain(10, "INTEGER", Struct("IntType"), OPT),
            Plain(11, "UNKNOWN", Struct("NullType"), OPT),
            Plain(12, "JSON", Struct("JsonType"), OPT),
            Plain(13, "BSON", Struct("BsonType"), OPT),
            Plain(14, "UUID", Struct("UUIDType"), OPT),
            Plain(15, "FLOAT16", Struct("Float16Type"), OPT),
            Plain(16, "VARIANT", Struct("VariantType"), OPT),
            Plain(17, "GEOMETRY", Struct("GeometryType"), OPT),
            Plain(18, "GEOGRAPHY", Struct("GeographyType"), OPT),
        ],
    ),
    def!(
        "AesGcmV1",
        &[
            Plain(1, "aad_prefix", Binary, OPT),
            Plain(2, "aad_file_unique", Binary, OPT),
            Plain(3, "supply_aad_prefix", Bool, OPT),
        ],
    ),
    def!(
        "AesGcmCtrV1",
        &[
            Plain(1, "aad_prefix", Binary, OPT),
            Plain(2, "aad_file_unique", Binary, OPT),
            Plain(3, "supply_aad_prefix", Bool, OPT),
        ],
    ),
    one_of!(
        "EncryptionAlgorithm",
        &[
            Plain(1, "AES_GCM_V1", Struct("AesGcmV1"), OPT),
            Plain(2, "AES_GCM_CTR_V1", Struct("AesGcmCtrV1"), OPT),
        ],
    ),
    def!("EncryptionWithFooterKey", &[]),
    def!(
        "EncryptionWithColumnKey",
        &[
            Nested(1, "path_in_schema", List, REQ, TEXT),
            Plain(2, "key_metadata", Binary, OPT),
        ],
    ),
    one_of!(
        "ColumnCryptoMetaData",
        &[
            Plain(1, "ENCRYPTION_WITH_FOOTER_KEY", Struct("EncryptionWithFooterKey"), OPT),
            Plain(2, "ENCRYPTION_WITH_COLUMN_KEY", Struct("EncryptionWithColumnKey"), OPT),
        ],
    ),
    def!(
        "PageHeader",
        &[
            Plain(1, "type", Enum(E::PageType), REQ),
            Plain(2, "uncompressed_page_size", I32, REQ),
            Plain(3, "compressed_page_size", I32, REQ),
            Plain(4, "crc", I32, OPT),
            Plain(5, "data_page_header", Struct("DataPageHeader"), OPT),
            Plain(6, "index_page_header", Struct("IndexPageHeader"), OPT),
            Plain(7, "dictionary_page_header", Struct("DictionaryPageHeader"), OPT),
            Plain(8, "data_page_header_v2", Struct("DataPageHeaderV2"), OPT),
        ],
    ),
    def!(
        "DataPageHeader",
        &[
            Plain(1, "num_values", I32, REQ),
            Plain(2, "encoding", Enum(E::Encoding), REQ),
            Plain(3, "definition_level_encoding", Enum(E::Encoding), REQ),
            Plain(4, "repetition_level_encoding", Enum(E::Encoding), REQ),
            Plain(5, "statistics", Struct("Statistics"), OPT),
        ],
    ),
    def!("IndexPageHeader", &[]),
    def!(
        "DictionaryPageHeader",
        &[
            Plain(1, "num_values", I32, REQ),
            Plain(2, "encoding", Enum(E::Encoding), REQ),
            Plain(3, "is_sorted", Bool, OPT),
        ],
    ),
    def!(
        "DataPageHeaderV2",
        &[
            Plain(1, "num_values", I32, REQ),
            Plain(2, "num_nulls", I32, REQ),
            Plain(3, "num_rows", I32, REQ),
            Plain(4, "encoding", Enum(E::Encoding), REQ),
            Plain(5, "definition_levels_byte_length", I32, REQ),
            Plain(6, "repetition_levels_byte_length", I32, REQ),
            Plain(7, "is_compressed", Bool, OPT),
            Plain(8, "statistics", Struct("Statistics"), OPT),
        ],
    ),
    def!(
        "ColumnIndex",
        &[
            Nested(1, "null_pages", List, REQ, Bool),
            Nested(2, "min_values", List, REQ, Binary),
            Nested(3, "max_values", List, REQ, Binary),
            Plain(4, "boundary_order", Enum(E::BoundaryOrder), REQ),
            Nested(5, "null_counts", List, OPT, I64),
            Nested(6, "repetition_level_histograms", List, OPT, I64),
            Nested(7, "definition_level_histograms", List, OPT, I64),
        ],
    ),
    def!(
        "PageLocation",
        &[
            Plain(1, "offset", I64, REQ),
            Plain(2, "compressed_page_size", I32, REQ),
            Plain(3, "first_row_index", I64, REQ),
        ],
    ),
    def!(
        "OffsetIndex",
        &[
            Nested(1, "page_locations", List, REQ, Struct("PageLocation")),
            Nested(2, "unencoded_byte_array_data_bytes", List, OPT, I64),
        ],
    ),
    def!("SplitBlockAlgorithm", &[]),
    def!("XxHash", &[]),
    def!("Uncompressed", &[]),
    one_of!("BloomFilterAlgorithm", &[Plain(1, "BLOCK", Struct("SplitBlockAlgorithm"), OPT)]),
    one_of!("BloomFilterHash", &[Plain(1, "XXHASH", Struct("XxHash"), OPT)]),
    one_of!("BloomFilterCompression", &[Plain(1, "UNCOMPRESSED", Struct("Uncompressed"), OPT)]),
    def!(
        "BloomFilterHeader",
        &[
            Plain(1, "numBytes", I32, REQ),
            Plain(2, "algorithm", Struct("BloomFilterAlgorithm"), REQ),
            Plain(3, "hash", Struct("BloomFilterHash"), REQ),
            Plain(4, "compression", Struct("BloomFilterCompression"), REQ),
        ],
    ),
];
