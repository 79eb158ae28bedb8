//! parquet-lens: print the segment tree of a parquet file as JSON.
//!
//! # Example
//!
//! ```bash
//! parquet-lens data.parquet --show-list-headers > segments.json
//! parquet-lens data.parquet --summary
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use parquet_lens::{AnalyzerConfig, FatalAnalysis, FileAnalysis, FileAnalyzer};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Byte-exact structural analysis of a parquet file
#[derive(Parser, Debug)]
#[command(name = "parquet-lens", version)]
#[command(about = "Explain every byte of a parquet file")]
struct Args {
    /// Parquet file to analyze
    file: PathBuf,

    /// Emit list headers, field headers and stop markers as explicit segments
    #[arg(long)]
    show_list_headers: bool,

    /// Emit zero-length markers for schema fields missing from the file
    #[arg(long = "show-undefined-optional-fields")]
    show_undefined_optional: bool,

    /// Leave uncovered bytes out instead of labeling them
    #[arg(long)]
    no_fill_gaps: bool,

    /// Log every decoded field, list and struct boundary
    #[arg(long)]
    debug: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: Level,

    /// Print the file summary and page listing instead of segments
    #[arg(long)]
    summary: bool,

    /// Memory-map the file instead of buffered reads
    #[cfg(feature = "mmap")]
    #[arg(long)]
    mmap: bool,
}

impl Args {
    fn config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_list_headers(self.show_list_headers)
            .with_undefined_optional(self.show_undefined_optional)
            .with_gap_filling(!self.no_fill_gaps)
            .with_debug(self.debug)
    }

    fn analyze(&self) -> std::result::Result<FileAnalysis, FatalAnalysis> {
        #[cfg(feature = "mmap")]
        if self.mmap {
            return FileAnalyzer::open_mmap(&self.file)?
                .with_config(self.config())
                .analyze_partial();
        }
        FileAnalyzer::open(&self.file)?.with_config(self.config()).analyze_partial()
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG.max(args.log_level) } else { args.log_level };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let analysis = match args.analyze() {
        Ok(analysis) => analysis,
        Err(FatalAnalysis { partial, error }) => {
            // verified framing still goes out before the non-zero exit
            print_json(&serde_json::to_value(&partial)?)?;
            return Err(error).with_context(|| format!("failed to analyze {}", args.file.display()));
        }
    };
    info!(
        segments = analysis.segments.len(),
        errors = analysis.error_count(),
        "analyzed {}",
        args.file.display()
    );

    let output = if args.summary {
        json!({
            "summary": analysis.summary,
            "pages": analysis.pages,
            "diagnostics": analysis.diagnostics,
        })
    } else {
        serde_json::to_value(&analysis.segments)?
    };
    print_json(&output)
}
