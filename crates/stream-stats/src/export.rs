//! Per-event spreadsheet export (CSV).
//!
//! One row per playback event with the columns Date, Hour, Song, Artist,
//! Minutes played, Platform, IP address, Reason start, Reason end.

use std::path::{Path, PathBuf};

use anyhow::Result;
use stats_core::models::PlaybackEvent;

const HEADERS: [&str; 9] = [
    "Date",
    "Hour",
    "Song",
    "Artist",
    "Minutes played",
    "Platform",
    "IP address",
    "Reason start",
    "Reason end",
];

/// Write one CSV row per event and return the path written.
///
/// When `output` is `None` the file lands beside the source as
/// `<source-stem>_History.csv`. Minutes are rendered with two decimals;
/// absent track/artist names use the `"Unknown"` placeholder and an absent
/// IP address becomes an empty cell.
pub fn export_history_csv(
    events: &[PlaybackEvent],
    source: &Path,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let target = match output {
        Some(path) => path.to_path_buf(),
        None => default_export_path(source),
    };

    let mut writer = csv::Writer::from_path(&target)?;
    writer.write_record(HEADERS)?;
    for event in events {
        writer.write_record([
            event.timestamp.format("%Y-%m-%d").to_string(),
            event.timestamp.format("%H:%M:%S").to_string(),
            event.track_label().to_string(),
            event.artist_label().to_string(),
            format!("{:.2}", event.minutes_played()),
            event.platform.clone(),
            event.ip_address.clone().unwrap_or_default(),
            event.reason_start.clone(),
            event.reason_end.clone(),
        ])?;
    }
    writer.flush()?;

    Ok(target)
}

fn default_export_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("history");
    source.with_file_name(format!("{stem}_History.csv"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
