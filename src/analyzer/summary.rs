// src/analyzer/summary.rs
use crate::analyzer::layout::{FileLayout, PageInfo};
use serde::Serialize;

/// Structural problem that has no byte range of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(offset: Option<u64>, message: impl Into<String>) -> Self {
        Diagnostic {
            offset,
            message: message.into(),
        }
    }
}

/// One decoded page header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub row_group: usize,
    pub column: usize,
    pub column_path: String,
    pub header_offset: u64,
    pub header_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompressed_page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_values: Option<i64>,
    /// False when the header could not be decoded in full.
    pub complete: bool,
    #[serde(skip)]
    pub info: PageInfo,
}

/// File-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub num_rows: i64,
    pub num_row_groups: usize,
    pub num_columns: usize,
    pub num_pages: usize,
    pub num_data_pages: usize,
    pub num_v1_data_pages: usize,
    pub num_v2_data_pages: usize,
    pub num_dict_pages: usize,
    /// Bytes taken by page headers.
    pub page_header_size: u64,
    pub uncompressed_page_data_size: i64,
    pub compressed_page_data_size: i64,
    /// Column chunk sizes declared in the footer, headers included.
    pub uncompressed_page_size: i64,
    pub compressed_page_size: i64,
    pub column_index_size: i64,
    pub offset_index_size: i64,
    pub bloom_filter_size: i64,
    pub footer_size: u64,
    pub file_size: u64,
}

impl FileSummary {
    pub fn compute(layout: &FileLayout, pages: &[PageSummary], footer_size: u64, file_size: u64) -> Self {
        let mut summary = FileSummary {
            num_rows: layout.num_rows.unwrap_or(0),
            num_row_groups: layout.row_groups.len(),
            num_columns: layout.row_groups.first().map(|rg| rg.columns.len()).unwrap_or(0),
            footer_size,
            file_size,
            ..Default::default()
        };

        for page in pages {
            summary.num_pages += 1;
            summary.page_header_size += page.header_size;
            if page.info.is_data_page() {
                summary.num_data_pages += 1;
            } else if page.info.is_dictionary_page() {
                summary.num_dict_pages += 1;
            }
            if page.info.is_v1_data_page {
                summary.num_v1_data_pages += 1;
            }
            if page.info.is_v2_data_page {
                summary.num_v2_data_pages += 1;
            }
            add_declared(&mut summary.uncompressed_page_data_size, page.uncompressed_page_size);
            add_declared(&mut summary.compressed_page_data_size, page.compressed_page_size);
        }

        for chunk in layout.column_chunks() {
            add_declared(&mut summary.uncompressed_page_size, chunk.total_uncompressed_size);
            add_declared(&mut summary.compressed_page_size, chunk.total_compressed_size);
            add_declared(&mut summary.column_index_size, chunk.column_index_length);
            add_declared(&mut summary.offset_index_size, chunk.offset_index_length);
            add_declared(&mut summary.bloom_filter_size, chunk.bloom_filter_length);
        }
        summary
    }
}

/// Sizes come straight from the footer, so totals saturate instead of overflowing.
fn add_declared(total: &mut i64, size: Option<i64>) {
    *total = total.saturating_add(size.unwrap_or(0));
}
