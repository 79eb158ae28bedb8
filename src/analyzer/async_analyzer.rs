// src/analyzer/async_analyzer.rs
use crate::analyzer::file_analyzer::{analyze_file, FileAnalysis};
use crate::config::AnalyzerConfig;
use crate::error::{LensError, Result};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

/// Analyze one file on the blocking thread pool.
pub async fn analyze_file_async(path: impl AsRef<Path>, config: AnalyzerConfig) -> Result<FileAnalysis> {
    let path = path.as_ref().to_path_buf();
    task::spawn_blocking(move || analyze_file(&path, &config))
        .await
        .map_err(|e| LensError::TaskFailed(e.to_string()))?
}

/// Analyze several files concurrently. Results come back in input order; one
/// file failing does not affect the others.
pub async fn analyze_files_async<P: AsRef<Path>>(paths: &[P], config: &AnalyzerConfig) -> Vec<Result<FileAnalysis>> {
    let handles: Vec<_> = paths
        .iter()
        .map(|p| {
            let path: PathBuf = p.as_ref().to_path_buf();
            let config = config.clone();
            debug!(path = %path.display(), "spawning analysis");
            task::spawn_blocking(move || analyze_file(&path, &config))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(LensError::TaskFailed(e.to_string())),
        });
    }
    results
}
