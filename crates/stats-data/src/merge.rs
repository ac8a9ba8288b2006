//! Merge-and-sort utility for directories of export files.
//!
//! Deliberately more lenient than the loader: a file that fails to read or
//! parse is skipped with a diagnostic and the merge continues. Leniency stops
//! at file granularity; records inside a parsable file are passed through
//! untouched and re-validated by whoever loads the merged output.

use std::path::{Path, PathBuf};

use serde_json::Value;
use stats_core::error::{HistoryError, Result};
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Files whose record arrays made it into the output.
    pub files_merged: usize,
    /// Files skipped because they could not be read or parsed.
    pub files_skipped: usize,
    /// Total records written.
    pub records: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files under `input_dir`, sorted by path.
pub fn find_json_files(input_dir: &Path) -> Vec<PathBuf> {
    if !input_dir.exists() {
        warn!("Input directory does not exist: {}", input_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Merge every parsable export file under `input_dir` into `output`, sorted
/// by ascending `ts`.
///
/// The sort is stable and lexicographic on the raw `ts` string, which is
/// chronological for the fixed-width zero-padded `...Z` layout. Records
/// without a `ts` field sort first. The output is a pretty-printed JSON
/// array.
pub fn merge_history_files(input_dir: &Path, output: &Path) -> Result<MergeSummary> {
    if !input_dir.is_dir() {
        return Err(HistoryError::FileNotFound(input_dir.to_path_buf()));
    }

    let mut summary = MergeSummary::default();
    let mut all_records: Vec<Value> = Vec::new();

    for file in find_json_files(input_dir) {
        match read_record_array(&file) {
            Ok(records) => {
                debug!("Merging {} records from {}", records.len(), file.display());
                summary.files_merged += 1;
                all_records.extend(records);
            }
            Err(err) => {
                warn!("Skipping {}: {}", file.display(), err);
                summary.files_skipped += 1;
            }
        }
    }

    // Vec::sort_by is stable: records with equal timestamps keep the order
    // their files were concatenated in.
    all_records.sort_by(|a, b| ts_key(a).cmp(ts_key(b)));
    summary.records = all_records.len();

    let json = serde_json::to_string_pretty(&all_records)?;
    std::fs::write(output, json)?;

    debug!(
        "Merged {} records from {} files into {} ({} skipped)",
        summary.records,
        summary.files_merged,
        output.display(),
        summary.files_skipped
    );
    Ok(summary)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_record_array(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| HistoryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn ts_key(record: &Value) -> &str {
    record.get("ts").and_then(Value::as_str).unwrap_or("")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
