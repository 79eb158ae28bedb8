// tests/file_analyzer_tests.rs
mod common;

use common::*;
use parquet::file::properties::{WriterProperties, WriterVersion};
use parquet_lens::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn default_config() -> AnalyzerConfig {
    AnalyzerConfig::default()
}

fn top_level<'a>(analysis: &'a FileAnalysis, name: &str) -> Vec<&'a Segment> {
    analysis.segments.iter().filter(|s| s.is_named(name)).collect()
}

#[test]
fn test_real_file_tiles_every_level() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 1000, WriterProperties::builder().build());

    let analysis = analyze_file(&path, &default_config()).unwrap();
    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(analysis.file_length, len);
    assert!(analysis.tiling_errors().is_empty(), "{:?}", analysis.tiling_errors());
    let nested = all_tiling_errors(&analysis.segments, len);
    assert!(nested.is_empty(), "{nested:?}");

    assert_eq!(analysis.error_count(), 0);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis
        .segments
        .iter()
        .all(|s| s.kind != SegmentKind::Unknown));
}

#[test]
fn test_real_file_framing_and_footer() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 250, WriterProperties::builder().build());
    let analysis = analyze_file(&path, &default_config()).unwrap();
    let len = analysis.file_length;

    let first = &analysis.segments[0];
    assert_eq!(first.kind, SegmentKind::Magic);
    assert_eq!(first.range, ByteRange::new(0, 4));
    assert_eq!(first.value.as_ref().and_then(SegmentValue::as_text), Some("PAR1"));

    let last = analysis.segments.last().unwrap();
    assert_eq!(last.kind, SegmentKind::Magic);
    assert_eq!(last.range, ByteRange::new(len - 4, len));

    let length = &analysis.segments[analysis.segments.len() - 2];
    assert_eq!(length.kind, SegmentKind::FooterLength);
    let footer = analysis.footer().unwrap();
    assert_eq!(length.value.as_ref().and_then(SegmentValue::as_i64), Some(footer.len() as i64));
    assert_eq!(footer.end(), length.start());

    let json = analysis.footer_json();
    assert_eq!(json["num_rows"], 250);
    assert_eq!(json["schema"][1]["name"], "id");
    assert_eq!(json["schema"][2]["type"], "BYTE_ARRAY");
    assert_eq!(json["row_groups"][0]["columns"][0]["meta_data"]["codec"], "UNCOMPRESSED");
}

#[test]
fn test_real_file_pages_and_summary() {
    let dir = tempdir().unwrap();
    let properties = WriterProperties::builder()
        .set_data_page_row_count_limit(100)
        .set_write_batch_size(100)
        .build();
    let path = write_parquet(dir.path(), 1000, properties);
    let analysis = analyze_file(&path, &default_config()).unwrap();

    let summary = &analysis.summary;
    assert_eq!(summary.num_rows, 1000);
    assert_eq!(summary.num_row_groups, 1);
    assert_eq!(summary.num_columns, 2);
    assert_eq!(summary.num_pages, analysis.pages.len());
    assert!(summary.num_data_pages >= 2);
    assert_eq!(summary.num_pages, summary.num_data_pages + summary.num_dict_pages);
    assert_eq!(summary.num_v1_data_pages, summary.num_data_pages);
    assert_eq!(summary.file_size, analysis.file_length);
    assert_eq!(
        summary.compressed_page_size,
        summary.compressed_page_data_size + summary.page_header_size as i64
    );

    let chunks = top_level(&analysis, "column_chunk");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].meta("path"), Some(&serde_json::json!("id")));
    assert_eq!(chunks[1].meta("path"), Some(&serde_json::json!("name")));

    for chunk in chunks {
        // page headers alternate with their payloads
        for pair in chunk.children.chunks(2) {
            assert!(pair[0].is_named("page"), "{:?}", pair[0].name);
            assert!(pair[1].is_named("page_data"));
            assert_eq!(pair[0].end(), pair[1].start());
            assert_eq!(pair[1].kind, SegmentKind::Data);
        }
    }

    assert!(analysis.pages.iter().all(|p| p.complete));
    assert!(analysis.pages.iter().any(|p| p.page_type.as_deref() == Some("DICTIONARY_PAGE")));
}

#[test]
fn test_v2_pages_are_counted() {
    let dir = tempdir().unwrap();
    let properties = WriterProperties::builder()
        .set_writer_version(WriterVersion::PARQUET_2_0)
        .build();
    let path = write_parquet(dir.path(), 300, properties);
    let analysis = analyze_file(&path, &default_config()).unwrap();

    assert!(analysis.summary.num_v2_data_pages > 0);
    assert_eq!(analysis.summary.num_v1_data_pages, 0);
    assert!(analysis.tiling_errors().is_empty());
}

#[test]
fn test_page_index_structures() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 500, WriterProperties::builder().build());
    let analysis = analyze_file(&path, &default_config()).unwrap();

    let column_indexes = top_level(&analysis, "column_index");
    let offset_indexes = top_level(&analysis, "offset_index");
    assert_eq!(column_indexes.len(), 2);
    assert_eq!(offset_indexes.len(), 2);
    assert!(column_indexes.iter().all(|s| s.kind == SegmentKind::ProtocolStruct));

    let locations = offset_indexes[0].to_plain_json();
    let first_offset = locations["page_locations"][0]["offset"].as_i64().unwrap();
    let first_data_page = analysis
        .pages
        .iter()
        .find(|p| p.column == 0 && p.page_type.as_deref() == Some("DATA_PAGE"))
        .unwrap();
    assert_eq!(first_offset as u64, first_data_page.header_offset);
    assert!(analysis.summary.column_index_size > 0);
    assert!(analysis.summary.offset_index_size > 0);
}

#[test]
fn test_bloom_filter_header_and_bitset() {
    let dir = tempdir().unwrap();
    let properties = WriterProperties::builder().set_bloom_filter_enabled(true).build();
    let path = write_parquet(dir.path(), 200, properties);
    let analysis = analyze_file(&path, &default_config()).unwrap();

    let headers = top_level(&analysis, "bloom_filter");
    let bitsets = top_level(&analysis, "bloom_filter_bitset");
    assert_eq!(headers.len(), 2);
    assert_eq!(bitsets.len(), 2);
    for (header, bitset) in headers.iter().zip(&bitsets) {
        assert_eq!(header.end(), bitset.start());
        let num_bytes = header.to_plain_json()["numBytes"].as_u64().unwrap();
        assert_eq!(bitset.len(), num_bytes);
    }
    assert!(analysis.tiling_errors().is_empty());
}

#[test]
fn test_truncated_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 50, WriterProperties::builder().build());
    let bytes = std::fs::read(&path).unwrap();

    let err = analyze_bytes(&bytes[..bytes.len() - 3], &default_config()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
    assert!(matches!(err, LensError::InvalidMagic { .. }));
    assert_eq!(err.offset(), Some(bytes.len() as u64 - 7));
}

#[test]
fn test_truncated_file_keeps_only_verified_framing() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 50, WriterProperties::builder().build());
    let bytes = std::fs::read(&path).unwrap();
    let truncated = &bytes[..bytes.len() - 1];

    let fatal = FileAnalyzer::new(std::io::Cursor::new(truncated))
        .unwrap()
        .analyze_partial()
        .unwrap_err();
    assert_eq!(fatal.error.category(), ErrorCategory::Format);
    assert_eq!(fatal.partial.len(), 1);
    assert!(fatal.partial[0].is_named("magic_number"));
    assert_eq!(fatal.partial[0].range, ByteRange::new(0, 4));
    assert!(fatal.partial.iter().all(|s| !s.is_named("footer") && !s.is_named("footer_length")));
}

#[test]
fn test_dropping_last_byte_is_a_format_error() {
    let file = single_column_file(&[vec![5u8; 12]]);
    let err = analyze_bytes(&file.bytes[..file.bytes.len() - 1], &default_config()).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn test_huge_declared_chunk_sizes_do_not_overflow() {
    let chunk = ChunkSpec {
        path: vec!["value".into()],
        data_page_offset: 4,
        total_compressed_size: i64::MAX,
        num_values: 1,
        file_path: None,
    };
    let footer = file_metadata(&[chunk.clone(), chunk], 1);
    let bytes = assemble(&page_header(4, 1), &footer);

    let analysis = analyze_bytes(&bytes, &default_config()).unwrap();
    assert_eq!(analysis.summary.compressed_page_size, i64::MAX);
    assert_eq!(analysis.summary.uncompressed_page_size, i64::MAX);
    assert!(!analysis.diagnostics.is_empty());
    assert!(analysis.tiling_errors().is_empty(), "{:?}", analysis.tiling_errors());
}

#[test]
fn test_analysis_is_deterministic() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), 300, WriterProperties::builder().build());
    let config = AnalyzerConfig::default().with_list_headers(true);

    let first = analyze_file(&path, &config).unwrap();
    let second = analyze_file(&path, &config).unwrap();
    assert_eq!(first.segments, second.segments);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_synthetic_page_walk() {
    let file = single_column_file(&[vec![7u8; 10], vec![9u8; 3]]);
    let analysis = analyze_bytes(&file.bytes, &default_config()).unwrap();
    assert!(analysis.tiling_errors().is_empty());

    let chunk = top_level(&analysis, "column_chunk")[0];
    assert_eq!(chunk.range, file.chunk);
    let ranges: Vec<_> = chunk.children.iter().map(|s| s.range).collect();
    let expected: Vec<_> = file.pages.iter().flat_map(|(h, p)| [*h, *p]).collect();
    assert_eq!(ranges, expected);

    let data = &chunk.children[1];
    assert_eq!(data.meta("page_type"), Some(&serde_json::json!("DATA_PAGE")));
    assert_eq!(data.meta("encoding"), Some(&serde_json::json!("PLAIN")));
    assert_eq!(data.meta("num_values"), Some(&serde_json::json!(10)));

    assert_eq!(analysis.footer().unwrap().range, file.footer);
    assert_eq!(analysis.pages.len(), 2);
    assert_eq!(analysis.pages[1].header_offset, file.pages[1].0.start);
}

#[test]
fn test_corrupt_page_header_degrades() {
    let mut file = single_column_file(&[vec![1u8; 8], vec![2u8; 8]]);
    // type nibble 0xF is not a compact type
    let second_header = file.pages[1].0.start as usize;
    file.bytes[second_header] = 0x1F;

    let analysis = analyze_bytes(&file.bytes, &default_config()).unwrap();
    assert!(analysis.tiling_errors().is_empty());
    let nested = all_tiling_errors(&analysis.segments, analysis.file_length);
    assert!(nested.is_empty(), "{nested:?}");

    assert_eq!(analysis.pages.len(), 2);
    assert!(analysis.pages[0].complete);
    assert!(!analysis.pages[1].complete);
    assert!(!analysis.diagnostics.is_empty());

    let chunk = top_level(&analysis, "column_chunk")[0];
    let broken = chunk.children.last().unwrap();
    assert!(broken.is_named("page"));
    assert_eq!(broken.end(), file.chunk.end);
    assert!(broken.walk().any(|s| s.kind == SegmentKind::Error));
}

#[test]
fn test_chunk_outside_data_region_is_diagnosed() {
    let chunk = ChunkSpec {
        path: vec!["value".into()],
        data_page_offset: 100_000,
        total_compressed_size: 10,
        num_values: 1,
        file_path: None,
    };
    let bytes = assemble(&[0u8; 6], &file_metadata(&[chunk], 1));
    let analysis = analyze_bytes(&bytes, &default_config()).unwrap();

    assert!(top_level(&analysis, "column_chunk").is_empty());
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics[0].message.contains("outside the data region"));
    assert_eq!(analysis.segments[1].kind, SegmentKind::Padding);
    assert!(analysis.tiling_errors().is_empty());
}

#[test]
fn test_external_chunk_is_diagnosed() {
    let chunk = ChunkSpec {
        path: vec!["value".into()],
        data_page_offset: 4,
        total_compressed_size: 2,
        num_values: 1,
        file_path: Some("part-0.parquet".into()),
    };
    let bytes = assemble(&[0xAB, 0xCD], &file_metadata(&[chunk], 1));
    let analysis = analyze_bytes(&bytes, &default_config()).unwrap();

    assert!(analysis.diagnostics[0].message.contains("part-0.parquet"));
    assert_eq!(analysis.segments[1].kind, SegmentKind::Unknown);
    assert_eq!(analysis.segments[1].range, ByteRange::new(4, 6));
}

#[test]
fn test_gap_filling_disabled() {
    let bytes = assemble(&[0u8; 6], &file_metadata(&[], 0));
    let config = AnalyzerConfig::default().with_gap_filling(false);
    let analysis = analyze_bytes(&bytes, &config).unwrap();

    assert!(analysis
        .walk()
        .all(|s| s.meta("gap").is_none()));
    assert_eq!(analysis.segments[1].range.start, 10);
    assert!(!analysis.tiling_errors().is_empty());
}

#[test]
fn test_undefined_optional_markers() {
    let file = single_column_file(&[vec![0u8; 4]]);
    let config = AnalyzerConfig::default().with_undefined_optional(true);
    let analysis = analyze_bytes(&file.bytes, &config).unwrap();

    let footer = analysis.footer().unwrap();
    let absent: Vec<_> = footer
        .children
        .iter()
        .filter(|s| s.meta("absent").is_some())
        .collect();
    assert!(absent.iter().any(|s| s.is_named("key_value_metadata")));
    assert!(absent.iter().all(|s| s.is_empty()));
    assert!(absent.iter().all(|s| s.meta("required") == Some(&serde_json::json!(false))));

    // markers sit on the stop byte and leave the tiling intact
    let stop = footer.children.last().unwrap();
    assert_eq!(stop.kind, SegmentKind::FieldStop);
    assert!(absent.iter().all(|s| s.start() == stop.start()));
    assert!(footer.tiling_errors().is_empty());
}

#[test]
fn test_segments_serialize() {
    let file = single_column_file(&[vec![3u8; 5]]);
    let analysis = analyze_bytes(&file.bytes, &default_config()).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["segments"][0]["kind"], "magic");
    assert_eq!(json["segments"][0]["range"], serde_json::json!([0, 4]));
    assert_eq!(json["segments"][0]["value"], "PAR1");
    assert_eq!(json["summary"]["num_pages"], 1);
    assert!(json.get("diagnostics").is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_synthetic_files_tile(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..48), 1..5),
        show_headers in any::<bool>(),
    ) {
        let file = single_column_file(&payloads);
        let config = AnalyzerConfig::default().with_list_headers(show_headers);
        let analysis = analyze_bytes(&file.bytes, &config).unwrap();
        let errors = all_tiling_errors(&analysis.segments, analysis.file_length);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(analysis.pages.len(), payloads.len());
    }

    #[test]
    fn prop_garbage_body_never_panics(
        body in prop::collection::vec(any::<u8>(), 0..64),
        data_page_offset in 0i64..80,
        total_compressed_size in -4i64..80,
    ) {
        let chunk = ChunkSpec {
            path: vec!["value".into()],
            data_page_offset,
            total_compressed_size,
            num_values: 1,
            file_path: None,
        };
        let bytes = assemble(&body, &file_metadata(&[chunk], 1));
        let analysis = analyze_bytes(&bytes, &AnalyzerConfig::default()).unwrap();
        let errors = all_tiling_errors(&analysis.segments, analysis.file_length);
        prop_assert!(errors.is_empty(), "{:?}", errors);
    }
}
