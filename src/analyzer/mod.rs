// src/analyzer/mod.rs
//! File-level orchestration: framing checks, footer decode, page walk,
//! index structures and the top-level tiling.

mod file_analyzer;
mod layout;
mod summary;

#[cfg(feature = "async")]
mod async_analyzer;

pub use file_analyzer::{analyze_bytes, analyze_file, FatalAnalysis, FileAnalysis, FileAnalyzer, FileFraming, ReadSeek};
pub use layout::{extract_layout, ColumnChunkLayout, FileLayout, PageInfo, RowGroupLayout};
pub use summary::{Diagnostic, FileSummary, PageSummary};

#[cfg(feature = "async")]
pub use async_analyzer::{analyze_file_async, analyze_files_async};
