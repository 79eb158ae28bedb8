// src/lib.rs
//! # parquet-lens
//!
//! Byte-exact structural analysis of Parquet files. Every byte of a file is
//! attributed to a labeled segment: magic numbers, the footer length, the
//! compact-protocol fields of the footer and page headers, list headers,
//! page payloads, padding, and whatever could not be explained.
//!
//! ## Features
//!
//! - 🔍 **Exact offsets**: every field, list header and stop marker is located to the byte
//! - 🧩 **Full tiling**: children of every segment cover their parent with no gaps or overlaps
//! - 🩹 **Error tolerant**: malformed metadata becomes `error` segments instead of aborting
//! - 📊 **Summaries**: page listings and size totals alongside the segment tree
//! - ⚡ **Async batches**: analyze many files concurrently with the `async` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parquet_lens::*;
//!
//! fn main() -> Result<()> {
//!     let analysis = analyze_file("data.parquet", &AnalyzerConfig::default())?;
//!
//!     for segment in &analysis.segments {
//!         println!("{} {}", segment.range, segment.kind);
//!     }
//!     println!("{} pages", analysis.summary.num_pages);
//!     Ok(())
//! }
//! ```
//!
//! ### Showing framing bytes
//!
//! ```rust,no_run
//! use parquet_lens::*;
//!
//! fn main() -> Result<()> {
//!     let config = AnalyzerConfig::default()
//!         .with_list_headers(true)
//!         .with_undefined_optional(true);
//!     let mut analyzer = FileAnalyzer::open("data.parquet")?.with_config(config);
//!     let analysis = analyzer.analyze()?;
//!     println!("{}", serde_json::to_string_pretty(&analysis.segments).unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ### Async batches
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! use parquet_lens::*;
//!
//! # #[cfg(feature = "async")]
//! #[tokio::main]
//! async fn main() {
//!     let paths = ["a.parquet", "b.parquet"];
//!     for result in analyze_files_async(&paths, &AnalyzerConfig::default()).await {
//!         match result {
//!             Ok(analysis) => println!("{} segments", analysis.segments.len()),
//!             Err(e) => eprintln!("{e}"),
//!         }
//!     }
//! }
//! # #[cfg(not(feature = "async"))]
//! # fn main() {}
//! ```

// Modules
pub mod analyzer;
pub mod config;
pub mod error;
pub mod protocol;
pub mod schema;
pub mod segment;
pub mod types;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use config::AnalyzerConfig;
pub use error::{ErrorCategory, LensError, Result};
pub use types::{ByteRange, WireType};

// Segment exports
pub use segment::{Segment, SegmentKind, SegmentValue};

// Protocol exports
pub use protocol::{decode_buffer, DecodeFailure, DecodeOutput, DecodePath, DecodeSession, PathStep};

// Schema exports
pub use schema::{resolve_enum_name, EnumKind, SchemaTables};

// Analyzer exports
pub use analyzer::{
    analyze_bytes,
    analyze_file,
    Diagnostic,
    FatalAnalysis,
    FileAnalysis,
    FileAnalyzer,
    FileFraming,
    FileSummary,
    PageSummary,
};

#[cfg(feature = "async")]
pub use analyzer::{analyze_file_async, analyze_files_async};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use parquet_lens::prelude::*;
    //! ```

    pub use crate::analyzer::{analyze_file, FileAnalysis, FileAnalyzer};
    pub use crate::config::AnalyzerConfig;
    pub use crate::error::{LensError, Result};
    pub use crate::segment::{Segment, SegmentKind, SegmentValue};
    pub use crate::types::ByteRange;

    #[cfg(feature = "async")]
    pub use crate::analyzer::{analyze_file_async, analyze_files_async};
}

/// Magic number at both ends of a parquet file
pub const PARQUET_MAGIC: &[u8; 4] = FileFraming::MAGIC;

/// Footer length word plus trailing magic
pub const FOOTER_TRAILER_SIZE: u64 = FileFraming::TRAILER_SIZE;

pub use protocol::COMPACT_SHORT_LIST_MAX;

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
