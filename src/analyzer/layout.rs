// src/analyzer/layout.rs
use crate::protocol::{DecodedList, DecodedStruct, DecodedValue};
use crate::schema::{resolve_enum_name, EnumKind};

/// Where one column chunk's structures live, as declared by the footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnChunkLayout {
    pub row_group: usize,
    pub column: usize,
    pub path: Vec<String>,
    /// Set when the chunk lives in another file.
    pub file_path: Option<String>,
    pub codec: Option<i64>,
    pub num_values: Option<i64>,
    pub data_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
    pub total_compressed_size: Option<i64>,
    pub total_uncompressed_size: Option<i64>,
    pub column_index_offset: Option<i64>,
    pub column_index_length: Option<i64>,
    pub offset_index_offset: Option<i64>,
    pub offset_index_length: Option<i64>,
    pub bloom_filter_offset: Option<i64>,
    pub bloom_filter_length: Option<i64>,
}

impl ColumnChunkLayout {
    /// First byte of the chunk: the dictionary page when it precedes the
    /// first data page, else the first data page.
    pub fn start_offset(&self) -> Option<u64> {
        let data = self.data_page_offset.and_then(|o| u64::try_from(o).ok())?;
        match self.dictionary_page_offset.and_then(|o| u64::try_from(o).ok()) {
            Some(dict) if dict > 0 && dict < data => Some(dict),
            _ => Some(data),
        }
    }

    /// Declared byte range of the pages, `[start, start + total_compressed_size)`.
    pub fn declared_end(&self) -> Option<u64> {
        let size = self.total_compressed_size.and_then(|s| u64::try_from(s).ok())?;
        self.start_offset().map(|start| start.saturating_add(size))
    }

    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    pub fn codec_name(&self) -> Option<&'static str> {
        self.codec.and_then(|c| resolve_enum_name(EnumKind::CompressionCodec, c))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowGroupLayout {
    pub num_rows: Option<i64>,
    pub total_byte_size: Option<i64>,
    pub columns: Vec<ColumnChunkLayout>,
}

/// File structure declared by the footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileLayout {
    pub version: Option<i64>,
    pub num_rows: Option<i64>,
    pub created_by: Option<String>,
    pub row_groups: Vec<RowGroupLayout>,
}

impl FileLayout {
    pub fn column_chunks(&self) -> impl Iterator<Item = &ColumnChunkLayout> {
        self.row_groups.iter().flat_map(|rg| rg.columns.iter())
    }
}

fn structs(list: Option<&DecodedList>) -> impl Iterator<Item = &DecodedStruct> {
    list.into_iter()
        .flat_map(|l| l.items.iter())
        .filter_map(DecodedValue::as_struct)
}

/// Read the layout out of a (possibly partial) decoded FileMetaData.
pub fn extract_layout(meta: &DecodedStruct) -> FileLayout {
    let row_groups = structs(meta.list_field(4))
        .enumerate()
        .map(|(rg_index, rg)| RowGroupLayout {
            num_rows: rg.i64_field(3),
            total_byte_size: rg.i64_field(2),
            columns: structs(rg.list_field(1))
                .enumerate()
                .map(|(col_index, chunk)| extract_column_chunk(rg_index, col_index, chunk))
                .collect(),
        })
        .collect();

    FileLayout {
        version: meta.i64_field(1),
        num_rows: meta.i64_field(3),
        created_by: meta.str_field(6).map(str::to_string),
        row_groups,
    }
}

fn extract_column_chunk(row_group: usize, column: usize, chunk: &DecodedStruct) -> ColumnChunkLayout {
    let mut layout = ColumnChunkLayout {
        row_group,
        column,
        file_path: chunk.str_field(1).map(str::to_string),
        offset_index_offset: chunk.i64_field(4),
        offset_index_length: chunk.i64_field(5),
        column_index_offset: chunk.i64_field(6),
        column_index_length: chunk.i64_field(7),
        ..Default::default()
    };

    if let Some(meta) = chunk.struct_field(3) {
        layout.path = meta
            .list_field(3)
            .map(|l| l.items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        layout.codec = meta.i64_field(4);
        layout.num_values = meta.i64_field(5);
        layout.total_uncompressed_size = meta.i64_field(6);
        layout.total_compressed_size = meta.i64_field(7);
        layout.data_page_offset = meta.i64_field(9);
        layout.dictionary_page_offset = meta.i64_field(11);
        layout.bloom_filter_offset = meta.i64_field(14);
        layout.bloom_filter_length = meta.i64_field(15);
    }
    layout
}

/// The fields of a PageHeader the page walk needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInfo {
    pub page_type: Option<i64>,
    pub uncompressed_page_size: Option<i64>,
    pub compressed_page_size: Option<i64>,
    pub num_values: Option<i64>,
    pub encoding: Option<i64>,
    pub has_statistics: bool,
    pub is_v1_data_page: bool,
    pub is_v2_data_page: bool,
}

impl PageInfo {
    pub fn from_header(header: &DecodedStruct) -> Self {
        let data_v1 = header.struct_field(5);
        let dict = header.struct_field(7);
        let data_v2 = header.struct_field(8);

        // num_values is field 1 of every page-type header; encoding is 2 in
        // v1 and dictionary headers and 4 in v2.
        let (num_values, encoding, stats) = if let Some(h) = data_v1 {
            (h.i64_field(1), h.i64_field(2), h.struct_field(5))
        } else if let Some(h) = data_v2 {
            (h.i64_field(1), h.i64_field(4), h.struct_field(8))
        } else if let Some(h) = dict {
            (h.i64_field(1), h.i64_field(2), None)
        } else {
            (None, None, None)
        };

        PageInfo {
            page_type: header.i64_field(1),
            uncompressed_page_size: header.i64_field(2),
            compressed_page_size: header.i64_field(3),
            num_values,
            encoding,
            has_statistics: stats.is_some(),
            is_v1_data_page: data_v1.is_some(),
            is_v2_data_page: data_v2.is_some(),
        }
    }

    pub fn page_type_name(&self) -> Option<&'static str> {
        self.page_type.and_then(|t| resolve_enum_name(EnumKind::PageType, t))
    }

    pub fn encoding_name(&self) -> Option<&'static str> {
        self.encoding.and_then(|e| resolve_enum_name(EnumKind::Encoding, e))
    }

    pub fn is_data_page(&self) -> bool {
        matches!(self.page_type_name(), Some("DATA_PAGE") | Some("DATA_PAGE_V2"))
    }

    pub fn is_dictionary_page(&self) -> bool {
        self.page_type_name() == Some("DICTIONARY_PAGE")
    }

    /// Payload length following the header, when declared and non-negative.
    pub fn payload_len(&self) -> Option<u64> {
        self.compressed_page_size.and_then(|s| u64::try_from(s).ok())
    }
}
