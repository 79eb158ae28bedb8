// src/analyzer/file_analyzer.rs
use crate::analyzer::layout::{extract_layout, ColumnChunkLayout, FileLayout, PageInfo};
use crate::analyzer::summary::{Diagnostic, FileSummary, PageSummary};
use crate::config::AnalyzerConfig;
use crate::error::{LensError, Result};
use crate::protocol::{decode_buffer, DecodeOutput, DecodeSession};
use crate::schema::SchemaTables;
use crate::segment::{build_struct_segment, fill_gaps, sort_segments, FillerProbe, Segment, SegmentKind, SegmentValue};
use crate::types::ByteRange;
use crate::utils::decode_text_lossy;
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Trait alias for Read + Seek
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Fixed framing of a parquet file: `PAR1 <pages> <footer> <u32 len> PAR1`.
pub struct FileFraming;

impl FileFraming {
    pub const MAGIC: &'static [u8; 4] = b"PAR1";
    pub const MAGIC_SIZE: u64 = 4;
    /// Footer length plus trailing magic.
    pub const TRAILER_SIZE: u64 = 8;
    pub const MIN_FILE_SIZE: u64 = 12;
}

/// Everything learned about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub file_length: u64,
    /// Top-level segments, sorted, covering `[0, file_length)` when gap
    /// filling is on.
    pub segments: Vec<Segment>,
    pub summary: FileSummary,
    pub pages: Vec<PageSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub layout: FileLayout,
}

/// A fatal failure together with the framing segments verified before it.
/// Nothing past the failed check is included.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct FatalAnalysis {
    pub partial: Vec<Segment>,
    pub error: LensError,
}

impl From<LensError> for FatalAnalysis {
    fn from(error: LensError) -> Self {
        FatalAnalysis {
            partial: Vec::new(),
            error,
        }
    }
}

impl FileAnalysis {
    pub fn footer(&self) -> Option<&Segment> {
        self.segments.iter().find(|s| s.is_named("footer"))
    }

    /// Decoded footer as plain JSON (field names to values).
    pub fn footer_json(&self) -> JsonValue {
        self.footer().map(Segment::to_plain_json).unwrap_or(JsonValue::Null)
    }

    /// Every segment in the tree, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().flat_map(Segment::walk)
    }

    pub fn error_count(&self) -> usize {
        self.walk().filter(|s| s.kind == SegmentKind::Error).count()
    }

    /// Problems with the top-level tiling of `[0, file_length)`.
    pub fn tiling_errors(&self) -> Vec<String> {
        Segment::new(ByteRange::new(0, self.file_length), SegmentKind::Unknown)
            .with_children(self.segments.clone())
            .tiling_errors()
    }
}

#[derive(Default)]
struct Collected {
    segments: Vec<Segment>,
    pages: Vec<PageSummary>,
    diagnostics: Vec<Diagnostic>,
}

impl Collected {
    fn diagnose(&mut self, offset: Option<u64>, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(offset, message);
        warn!(offset = ?diagnostic.offset, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}

/// Padding probe that reads the bytes from the analyzed file.
struct ReaderProbe<'a, R: ReadSeek> {
    file: &'a mut R,
}

impl<R: ReadSeek> FillerProbe for ReaderProbe<'_, R> {
    fn all_equal(&mut self, range: ByteRange, byte: u8) -> bool {
        if self.file.seek(SeekFrom::Start(range.start)).is_err() {
            return false;
        }
        let mut buf = [0u8; 8192];
        let mut remaining = range.len();
        while remaining > 0 {
            let n = remaining.min(buf.len() as u64) as usize;
            if self.file.read_exact(&mut buf[..n]).is_err() {
                return false;
            }
            if buf[..n].iter().any(|b| *b != byte) {
                return false;
            }
            remaining -= n as u64;
        }
        true
    }
}

/// Structural analyzer for one parquet file.
pub struct FileAnalyzer<R: ReadSeek> {
    file: R,
    file_length: u64,
    config: AnalyzerConfig,
    tables: &'static SchemaTables,
}

/// Constructor for standard file I/O
impl FileAnalyzer<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::with_capacity(65536, file))
    }
}

/// Constructor for memory-mapped file I/O (requires "mmap" feature)
#[cfg(feature = "mmap")]
impl FileAnalyzer<Cursor<Mmap>> {
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::new(Cursor::new(mmap))
    }
}

impl<R: ReadSeek> FileAnalyzer<R> {
    pub fn new(mut file: R) -> Result<Self> {
        let file_length = file.seek(SeekFrom::End(0))?;
        Ok(FileAnalyzer {
            file,
            file_length,
            config: AnalyzerConfig::default(),
            tables: SchemaTables::parquet(),
        })
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    pub fn into_inner(self) -> R {
        self.file
    }

    /// Run the whole analysis. Only framing problems (magic, footer length)
    /// and I/O failures on the header or footer are errors; everything
    /// after that degrades to `error` segments and diagnostics.
    pub fn analyze(&mut self) -> Result<FileAnalysis> {
        self.analyze_partial().map_err(|fatal| fatal.error)
    }

    /// Like [`analyze`](Self::analyze), but a fatal failure keeps the
    /// framing segments (magics, footer length) verified before it.
    pub fn analyze_partial(&mut self) -> std::result::Result<FileAnalysis, FatalAnalysis> {
        let mut framing = Vec::new();
        let located = self.check_framing(&mut framing);
        let result = match located {
            Ok((footer_start, footer_length)) => self.analyze_located(framing.clone(), footer_start, footer_length),
            Err(error) => Err(error),
        };
        result.map_err(|error| {
            sort_segments(&mut framing);
            warn!(offset = error.offset(), verified = framing.len(), "fatal: {error}");
            FatalAnalysis {
                partial: framing,
                error,
            }
        })
    }

    fn analyze_located(&mut self, framing: Vec<Segment>, footer_start: u64, footer_length: u64) -> Result<FileAnalysis> {
        let len = self.file_length;
        info!(file_length = len, footer_start, footer_length, "located footer");

        let mut out = Collected::default();
        out.segments.extend(framing);

        let mut footer_bytes = vec![0u8; footer_length as usize];
        self.read_exact_at(footer_start, &mut footer_bytes)?;
        let footer = decode_buffer(&footer_bytes, footer_start, Some("FileMetaData"), self.tables, &self.config);
        if let Some(failure) = &footer.failure {
            out.diagnose(Some(failure.offset), format!("footer metadata: {}", failure.message));
        }
        let footer_segment = build_struct_segment(&footer, "footer", self.tables, &self.config);
        let footer_size = footer_segment.len();
        out.segments.push(footer_segment);

        let layout = extract_layout(&footer.root);
        debug!(row_groups = layout.row_groups.len(), "extracted layout");

        for chunk in layout.column_chunks() {
            if let Some(segment) = self.walk_column_chunk(chunk, footer_start, &mut out) {
                out.segments.push(segment);
            }
            self.decode_index(
                chunk.column_index_offset,
                chunk.column_index_length,
                ("column_index", "ColumnIndex"),
                footer_start,
                &mut out,
            );
            self.decode_index(
                chunk.offset_index_offset,
                chunk.offset_index_length,
                ("offset_index", "OffsetIndex"),
                footer_start,
                &mut out,
            );
            self.decode_bloom_filter(chunk, footer_start, &mut out);
        }

        let Collected {
            segments,
            pages,
            mut diagnostics,
        } = out;
        let segments = resolve_overlaps(segments, &mut diagnostics);
        let mut probe = ReaderProbe { file: &mut self.file };
        let segments = fill_gaps(ByteRange::new(0, len), segments, &[], &mut probe, &self.config);

        let summary = FileSummary::compute(&layout, &pages, footer_size, len);
        info!(
            segments = segments.len(),
            pages = pages.len(),
            diagnostics = diagnostics.len(),
            "analysis complete"
        );

        Ok(FileAnalysis {
            file_length: len,
            segments,
            summary,
            pages,
            diagnostics,
            layout,
        })
    }

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    /// Check both magics and the footer length; returns the footer start and
    /// length. Each framing segment is pushed to `verified` once checked.
    fn check_framing(&mut self, verified: &mut Vec<Segment>) -> Result<(u64, u64)> {
        let len = self.file_length;
        let mut magic = [0u8; 4];
        let leading_ok = if len >= FileFraming::MAGIC_SIZE {
            self.read_exact_at(0, &mut magic)?;
            &magic == FileFraming::MAGIC
        } else {
            false
        };
        if leading_ok {
            verified.push(magic_segment(0));
        }

        if len < FileFraming::MIN_FILE_SIZE {
            return Err(LensError::Truncated {
                offset: 0,
                needed: FileFraming::MIN_FILE_SIZE,
                file_length: len,
            });
        }
        if !leading_ok {
            return Err(LensError::InvalidMagic {
                offset: 0,
                expected: decode_text_lossy(FileFraming::MAGIC),
                found: decode_text_lossy(&magic),
            });
        }

        let trailer_start = len - FileFraming::TRAILER_SIZE;
        self.file.seek(SeekFrom::Start(trailer_start))?;
        let footer_length = self.file.read_u32::<LittleEndian>()? as u64;
        self.file.read_exact(&mut magic)?;
        if &magic != FileFraming::MAGIC {
            return Err(LensError::InvalidMagic {
                offset: len - FileFraming::MAGIC_SIZE,
                expected: decode_text_lossy(FileFraming::MAGIC),
                found: decode_text_lossy(&magic),
            });
        }
        verified.push(magic_segment(len - FileFraming::MAGIC_SIZE));

        let available = len - FileFraming::MIN_FILE_SIZE;
        if footer_length > available {
            return Err(LensError::FooterTooLarge {
                offset: trailer_start,
                footer_length,
                available,
            });
        }
        verified.push(
            Segment::new(ByteRange::new(trailer_start, trailer_start + 4), SegmentKind::FooterLength)
                .with_name("footer_length")
                .with_value(SegmentValue::Int(footer_length as i64)),
        );
        Ok((trailer_start - footer_length, footer_length))
    }

    /// Decode one struct from `region`, closing interrupted scopes at its end.
    fn decode_at(&mut self, region: ByteRange, struct_name: &'static str) -> Result<DecodeOutput> {
        self.file.seek(SeekFrom::Start(region.start))?;
        let reader = (&mut self.file).take(region.len());
        Ok(DecodeSession::new(reader, region.start, region.end, self.tables, &self.config).decode_struct(Some(struct_name)))
    }

    fn walk_column_chunk(&mut self, chunk: &ColumnChunkLayout, data_end: u64, out: &mut Collected) -> Option<Segment> {
        let label = format!("column chunk {}:{} ({})", chunk.row_group, chunk.column, chunk.path_string());
        if let Some(path) = &chunk.file_path {
            out.diagnose(None, format!("{label} is stored in external file {path}"));
            return None;
        }
        let Some(start) = chunk.start_offset() else {
            out.diagnose(None, format!("{label} has no valid page offset"));
            return None;
        };
        if start < FileFraming::MAGIC_SIZE || start >= data_end {
            out.diagnose(Some(start), format!("{label} starts outside the data region"));
            return None;
        }
        let end = match chunk.declared_end() {
            Some(end) if end > data_end => {
                out.diagnose(Some(start), format!("{label} runs past the footer; clamped"));
                data_end
            }
            Some(end) => end,
            None => {
                out.diagnose(Some(start), format!("{label} has no total_compressed_size"));
                data_end
            }
        };

        let mut children = Vec::new();
        let mut offset = start;
        while offset < end {
            let output = match self.decode_at(ByteRange::new(offset, end), "PageHeader") {
                Ok(output) => output,
                Err(e) => {
                    out.diagnose(Some(offset), format!("{label}: {e}"));
                    children.push(Segment::error(ByteRange::new(offset, end), e.to_string()));
                    break;
                }
            };

            let header = build_struct_segment(&output, "page", self.tables, &self.config);
            let info = PageInfo::from_header(&output.root);
            let header_end = output.range.end;
            debug!(
                offset,
                header_size = header_end - offset,
                page_type = info.page_type_name().unwrap_or("?"),
                compressed = ?info.compressed_page_size,
                "page header"
            );
            let statistics = page_statistics(&header);
            children.push(header);
            out.pages.push(PageSummary {
                row_group: chunk.row_group,
                column: chunk.column,
                column_path: chunk.path_string(),
                header_offset: offset,
                header_size: header_end - offset,
                page_type: info.page_type_name().map(str::to_string),
                encoding: info.encoding_name().map(str::to_string),
                compressed_page_size: info.compressed_page_size,
                uncompressed_page_size: info.uncompressed_page_size,
                num_values: info.num_values,
                complete: output.is_complete(),
                info: info.clone(),
            });

            if let Some(failure) = &output.failure {
                out.diagnose(Some(failure.offset), format!("{label} page header: {}", failure.message));
                break;
            }
            let Some(payload) = info.payload_len() else {
                out.diagnose(Some(offset), format!("{label} page header has no valid compressed_page_size"));
                break;
            };

            let mut payload_end = header_end.saturating_add(payload);
            let mut data = Segment::new(ByteRange::empty_at(header_end), SegmentKind::Data).with_name("page_data");
            if payload_end > end {
                out.diagnose(Some(header_end), format!("{label} page payload runs past the chunk end"));
                payload_end = end;
                data.set_meta("truncated", true);
            }
            data.range = ByteRange::new(header_end, payload_end);
            annotate_page_data(&mut data, &info, chunk, statistics);
            children.push(data);
            offset = payload_end;
        }

        let chunk_range = ByteRange::new(start, end);
        let mut probe = ReaderProbe { file: &mut self.file };
        let children = fill_gaps(chunk_range, children, &[], &mut probe, &self.config);
        let mut segment = Segment::new(chunk_range, SegmentKind::ColumnChunk)
            .with_name("column_chunk")
            .with_children(children)
            .with_meta("row_group", chunk.row_group)
            .with_meta("column", chunk.column)
            .with_meta("path", chunk.path_string());
        if let Some(codec) = chunk.codec_name() {
            segment.set_meta("codec", codec);
        }
        Some(segment)
    }

    /// Validate an index region declared by the footer.
    fn index_region(offset: Option<i64>, length: Option<i64>, data_end: u64, name: &str, out: &mut Collected) -> Option<ByteRange> {
        let offset = offset?;
        let start = match u64::try_from(offset) {
            Ok(start) if start >= FileFraming::MAGIC_SIZE && start < data_end => start,
            _ => {
                out.diagnose(None, format!("{name} offset {offset} is outside the data region"));
                return None;
            }
        };
        let end = match length.map(u64::try_from) {
            Some(Ok(length)) => start.saturating_add(length),
            Some(Err(_)) => {
                out.diagnose(Some(start), format!("{name} has a negative length"));
                return None;
            }
            None => data_end,
        };
        if end > data_end {
            out.diagnose(Some(start), format!("{name} runs past the footer; clamped"));
        }
        Some(ByteRange::new(start, end.min(data_end)))
    }

    fn decode_index(
        &mut self,
        offset: Option<i64>,
        length: Option<i64>,
        (name, struct_name): (&str, &'static str),
        data_end: u64,
        out: &mut Collected,
    ) {
        let Some(region) = Self::index_region(offset, length, data_end, name, out) else {
            return;
        };
        match self.decode_at(region, struct_name) {
            Ok(output) => {
                if let Some(failure) = &output.failure {
                    out.diagnose(Some(failure.offset), format!("{name}: {}", failure.message));
                }
                out.segments.push(build_struct_segment(&output, name, self.tables, &self.config));
            }
            Err(e) => out.diagnose(Some(region.start), format!("{name}: {e}")),
        }
    }

    fn decode_bloom_filter(&mut self, chunk: &ColumnChunkLayout, data_end: u64, out: &mut Collected) {
        let Some(region) = Self::index_region(chunk.bloom_filter_offset, chunk.bloom_filter_length, data_end, "bloom_filter", out)
        else {
            return;
        };
        let output = match self.decode_at(region, "BloomFilterHeader") {
            Ok(output) => output,
            Err(e) => {
                out.diagnose(Some(region.start), format!("bloom_filter: {e}"));
                return;
            }
        };
        out.segments.push(build_struct_segment(&output, "bloom_filter", self.tables, &self.config));
        if let Some(failure) = &output.failure {
            out.diagnose(Some(failure.offset), format!("bloom_filter: {}", failure.message));
            return;
        }

        let Some(num_bytes) = output.root.i64_field(1).and_then(|n| u64::try_from(n).ok()) else {
            out.diagnose(Some(region.start), "bloom_filter header has no valid numBytes");
            return;
        };
        let bitset_start = output.range.end;
        let mut bitset_end = bitset_start.saturating_add(num_bytes);
        let mut bitset = Segment::new(ByteRange::empty_at(bitset_start), SegmentKind::Data)
            .with_name("bloom_filter_bitset")
            .with_meta("num_bytes", num_bytes);
        if bitset_end > region.end {
            out.diagnose(Some(bitset_start), "bloom_filter bitset runs past its region");
            bitset_end = region.end;
            bitset.set_meta("truncated", true);
        }
        bitset.range = ByteRange::new(bitset_start, bitset_end);
        out.segments.push(bitset);
    }
}

fn magic_segment(offset: u64) -> Segment {
    Segment::new(ByteRange::new(offset, offset + FileFraming::MAGIC_SIZE), SegmentKind::Magic)
        .with_name("magic_number")
        .with_value(SegmentValue::Text(decode_text_lossy(FileFraming::MAGIC)))
}

/// Statistics of a data page header, as plain JSON.
fn page_statistics(header: &Segment) -> Option<JsonValue> {
    let plain = header.to_plain_json();
    ["data_page_header", "data_page_header_v2"]
        .iter()
        .find_map(|key| plain.get(*key).and_then(|h| h.get("statistics")).cloned())
}

fn annotate_page_data(data: &mut Segment, info: &PageInfo, chunk: &ColumnChunkLayout, statistics: Option<JsonValue>) {
    if let Some(page_type) = info.page_type_name() {
        data.set_meta("page_type", page_type);
    }
    if let Some(encoding) = info.encoding_name() {
        data.set_meta("encoding", encoding);
    }
    if let Some(codec) = chunk.codec_name() {
        data.set_meta("codec", codec);
    }
    if let Some(num_values) = info.num_values {
        data.set_meta("num_values", num_values);
    }
    if let Some(size) = info.compressed_page_size {
        data.set_meta("compressed_page_size", size);
    }
    if let Some(size) = info.uncompressed_page_size {
        data.set_meta("uncompressed_page_size", size);
    }
    if let Some(statistics) = statistics {
        data.set_meta("statistics", statistics);
    }
}

/// Clip segments that start inside an earlier one to an `error` segment
/// over their remainder; drop those wholly contained.
fn resolve_overlaps(mut segments: Vec<Segment>, diagnostics: &mut Vec<Diagnostic>) -> Vec<Segment> {
    sort_segments(&mut segments);
    let mut resolved: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut cursor = 0u64;
    for segment in segments {
        let label = segment.name.clone().unwrap_or_else(|| segment.kind.to_string());
        if segment.start() >= cursor {
            cursor = cursor.max(segment.end());
            resolved.push(segment);
        } else if segment.end() <= cursor {
            let diagnostic = Diagnostic::new(
                Some(segment.start()),
                format!("{label} {} lies inside a preceding segment; dropped", segment.range),
            );
            warn!(offset = segment.start(), "{}", diagnostic.message);
            diagnostics.push(diagnostic);
        } else {
            let message = format!("{label} {} overlaps a preceding segment", segment.range);
            warn!(offset = segment.start(), "{}", message);
            diagnostics.push(Diagnostic::new(Some(segment.start()), message.clone()));
            resolved.push(
                Segment::error(ByteRange::new(cursor, segment.end()), message)
                    .with_name(label)
                    .with_meta("original_range", vec![segment.start(), segment.end()]),
            );
            cursor = segment.end();
        }
    }
    resolved
}

/// Analyze the file at `path`.
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalyzerConfig) -> Result<FileAnalysis> {
    FileAnalyzer::open(path)?.with_config(config.clone()).analyze()
}

/// Analyze an in-memory file image.
pub fn analyze_bytes(bytes: &[u8], config: &AnalyzerConfig) -> Result<FileAnalysis> {
    FileAnalyzer::new(Cursor::new(bytes))?.with_config(config.clone()).analyze()
}
