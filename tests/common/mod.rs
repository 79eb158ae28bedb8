// tests/common/mod.rs
#![allow(dead_code)]

use parquet::data_type::{ByteArray, ByteArrayType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use parquet_lens::{ByteRange, Segment};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thrift::protocol::{
    TCompactOutputProtocol, TFieldIdentifier, TListIdentifier, TOutputProtocol, TStructIdentifier, TType,
};

/// Encode with a compact output protocol into a fresh buffer.
pub fn compact<F>(write: F) -> Vec<u8>
where
    F: FnOnce(&mut dyn TOutputProtocol) -> thrift::Result<()>,
{
    let mut buf = Vec::new();
    {
        let mut protocol = TCompactOutputProtocol::new(&mut buf);
        write(&mut protocol).unwrap();
        protocol.flush().unwrap();
    }
    buf
}

pub fn begin(p: &mut dyn TOutputProtocol) -> thrift::Result<()> {
    p.write_struct_begin(&TStructIdentifier::new("fixture"))
}

pub fn end(p: &mut dyn TOutputProtocol) -> thrift::Result<()> {
    p.write_field_stop()?;
    p.write_struct_end()
}

pub fn field(p: &mut dyn TOutputProtocol, id: i16, ttype: TType) -> thrift::Result<()> {
    p.write_field_begin(&TFieldIdentifier::new("f", ttype, id))
}

pub fn i32_field(p: &mut dyn TOutputProtocol, id: i16, value: i32) -> thrift::Result<()> {
    field(p, id, TType::I32)?;
    p.write_i32(value)?;
    p.write_field_end()
}

pub fn i64_field(p: &mut dyn TOutputProtocol, id: i16, value: i64) -> thrift::Result<()> {
    field(p, id, TType::I64)?;
    p.write_i64(value)?;
    p.write_field_end()
}

pub fn string_field(p: &mut dyn TOutputProtocol, id: i16, value: &str) -> thrift::Result<()> {
    field(p, id, TType::String)?;
    p.write_string(value)?;
    p.write_field_end()
}

pub fn string_list_field(p: &mut dyn TOutputProtocol, id: i16, values: &[String]) -> thrift::Result<()> {
    field(p, id, TType::List)?;
    p.write_list_begin(&TListIdentifier::new(TType::String, values.len() as i32))?;
    for value in values {
        p.write_string(value)?;
    }
    p.write_list_end()?;
    p.write_field_end()
}

pub fn i32_list_field(p: &mut dyn TOutputProtocol, id: i16, values: &[i32]) -> thrift::Result<()> {
    field(p, id, TType::List)?;
    p.write_list_begin(&TListIdentifier::new(TType::I32, values.len() as i32))?;
    for value in values {
        p.write_i32(*value)?;
    }
    p.write_list_end()?;
    p.write_field_end()
}

/// A DATA_PAGE header, PLAIN encoded, with `payload_len` bytes following.
pub fn page_header(payload_len: i32, num_values: i32) -> Vec<u8> {
    compact(|p| {
        begin(p)?;
        i32_field(p, 1, 0)?;
        i32_field(p, 2, payload_len)?;
        i32_field(p, 3, payload_len)?;
        field(p, 5, TType::Struct)?;
        begin(p)?;
        i32_field(p, 1, num_values)?;
        i32_field(p, 2, 0)?;
        i32_field(p, 3, 3)?;
        i32_field(p, 4, 3)?;
        end(p)?;
        p.write_field_end()?;
        end(p)
    })
}

/// Where the footer says one column chunk lives.
#[derive(Debug, Clone)]
pub struct ChunkSpec {
    pub path: Vec<String>,
    pub data_page_offset: i64,
    pub total_compressed_size: i64,
    pub num_values: i64,
    pub file_path: Option<String>,
}

fn column_metadata(p: &mut dyn TOutputProtocol, chunk: &ChunkSpec) -> thrift::Result<()> {
    begin(p)?;
    i32_field(p, 1, 2)?;
    i32_list_field(p, 2, &[0, 3])?;
    string_list_field(p, 3, &chunk.path)?;
    i32_field(p, 4, 0)?;
    i64_field(p, 5, chunk.num_values)?;
    i64_field(p, 6, chunk.total_compressed_size)?;
    i64_field(p, 7, chunk.total_compressed_size)?;
    i64_field(p, 9, chunk.data_page_offset)?;
    end(p)
}

/// FileMetaData with one INT64 leaf per chunk and a single row group.
pub fn file_metadata(chunks: &[ChunkSpec], num_rows: i64) -> Vec<u8> {
    compact(|p| {
        begin(p)?;
        i32_field(p, 1, 1)?;

        field(p, 2, TType::List)?;
        p.write_list_begin(&TListIdentifier::new(TType::Struct, chunks.len() as i32 + 1))?;
        begin(p)?;
        string_field(p, 4, "schema")?;
        i32_field(p, 5, chunks.len() as i32)?;
        end(p)?;
        for chunk in chunks {
            begin(p)?;
            i32_field(p, 1, 2)?;
            i32_field(p, 3, 0)?;
            string_field(p, 4, &chunk.path.join("."))?;
            end(p)?;
        }
        p.write_list_end()?;
        p.write_field_end()?;

        i64_field(p, 3, num_rows)?;

        field(p, 4, TType::List)?;
        p.write_list_begin(&TListIdentifier::new(TType::Struct, 1))?;
        begin(p)?;
        field(p, 1, TType::List)?;
        p.write_list_begin(&TListIdentifier::new(TType::Struct, chunks.len() as i32))?;
        for chunk in chunks {
            begin(p)?;
            if let Some(path) = &chunk.file_path {
                string_field(p, 1, path)?;
            }
            i64_field(p, 2, chunk.data_page_offset)?;
            field(p, 3, TType::Struct)?;
            column_metadata(p, chunk)?;
            p.write_field_end()?;
            end(p)?;
        }
        p.write_list_end()?;
        p.write_field_end()?;
        i64_field(p, 2, chunks.iter().map(|c| c.total_compressed_size).sum())?;
        i64_field(p, 3, num_rows)?;
        end(p)?;
        p.write_list_end()?;
        p.write_field_end()?;

        string_field(p, 6, "parquet-lens fixtures")?;
        end(p)
    })
}

/// `PAR1 <body> <footer> <footer len> PAR1`
pub fn assemble(body: &[u8], footer: &[u8]) -> Vec<u8> {
    let mut file = b"PAR1".to_vec();
    file.extend_from_slice(body);
    file.extend_from_slice(footer);
    file.extend_from_slice(&(footer.len() as u32).to_le_bytes());
    file.extend_from_slice(b"PAR1");
    file
}

/// One column of data pages starting right after the header magic.
pub struct SyntheticFile {
    pub bytes: Vec<u8>,
    /// `(header range, payload range)` of every page.
    pub pages: Vec<(ByteRange, ByteRange)>,
    pub chunk: ByteRange,
    pub footer: ByteRange,
}

pub fn single_column_file(payloads: &[Vec<u8>]) -> SyntheticFile {
    let mut body = Vec::new();
    let mut pages = Vec::new();
    for payload in payloads {
        let header = page_header(payload.len() as i32, payload.len() as i32);
        let header_start = 4 + body.len() as u64;
        let payload_start = header_start + header.len() as u64;
        pages.push((
            ByteRange::new(header_start, payload_start),
            ByteRange::new(payload_start, payload_start + payload.len() as u64),
        ));
        body.extend_from_slice(&header);
        body.extend_from_slice(payload);
    }

    let chunk = ChunkSpec {
        path: vec!["value".to_string()],
        data_page_offset: 4,
        total_compressed_size: body.len() as i64,
        num_values: payloads.iter().map(|p| p.len() as i64).sum(),
        file_path: None,
    };
    let footer = file_metadata(&[chunk], 1);
    let footer_start = 4 + body.len() as u64;
    SyntheticFile {
        bytes: assemble(&body, &footer),
        pages,
        chunk: ByteRange::new(4, footer_start),
        footer: ByteRange::new(footer_start, footer_start + footer.len() as u64),
    }
}

/// Write a two-column file (`id` INT64, `name` optional UTF8) with the parquet crate.
pub fn write_parquet(dir: &Path, rows: usize, properties: WriterProperties) -> PathBuf {
    let path = dir.join("fixture.parquet");
    let schema = Arc::new(
        parse_message_type(
            "message schema {
                REQUIRED INT64 id;
                OPTIONAL BYTE_ARRAY name (UTF8);
            }",
        )
        .unwrap(),
    );
    let file = File::create(&path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, Arc::new(properties)).unwrap();

    let ids: Vec<i64> = (0..rows as i64).collect();
    let def_levels: Vec<i16> = (0..rows).map(|i| if i % 5 == 0 { 0 } else { 1 }).collect();
    let names: Vec<ByteArray> = (0..rows)
        .filter(|i| i % 5 != 0)
        .map(|i| ByteArray::from(format!("name-{}", i % 17).as_str()))
        .collect();

    let mut row_group = writer.next_row_group().unwrap();
    let mut column = row_group.next_column().unwrap().unwrap();
    column.typed::<Int64Type>().write_batch(&ids, None, None).unwrap();
    column.close().unwrap();
    let mut column = row_group.next_column().unwrap().unwrap();
    column
        .typed::<ByteArrayType>()
        .write_batch(&names, Some(def_levels.as_slice()), None)
        .unwrap();
    column.close().unwrap();
    row_group.close().unwrap();
    writer.close().unwrap();
    path
}

/// Every tiling problem anywhere in `segments`, as covering `[0, len)`.
pub fn all_tiling_errors(segments: &[Segment], len: u64) -> Vec<String> {
    let root = Segment::new(ByteRange::new(0, len), parquet_lens::SegmentKind::Unknown).with_children(segments.to_vec());
    root.walk().flat_map(|s| s.tiling_errors()).collect()
}
