//! Export-file loading and per-record validation.
//!
//! An export file is a JSON array of playback records. The whole array is
//! validated up front: the first malformed record aborts the load with an
//! error naming the record index and field, so downstream reports can assume
//! a fully well-formed event list and never re-check field presence.

use std::path::Path;

use serde_json::Value;
use stats_core::error::{HistoryError, Result};
use stats_core::models::PlaybackEvent;
use stats_core::time_utils::parse_event_timestamp;
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a streaming-history export file into validated events.
///
/// Events keep the order they have in the file; no sorting is applied.
/// Partial results are never returned: a single malformed record fails the
/// whole load with [`HistoryError::MalformedEvent`].
pub fn load_events(path: &Path) -> Result<Vec<PlaybackEvent>> {
    if !path.is_file() {
        return Err(HistoryError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| HistoryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Value> = serde_json::from_str(&content)?;

    let events = records
        .iter()
        .enumerate()
        .map(|(index, record)| event_from_record(index, record))
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Validate one raw record into a [`PlaybackEvent`].
///
/// Required: `ts` (strict `...Z` layout), `ms_played` (non-negative integer),
/// `platform`, `reason_start`, `reason_end`. Track, artist and IP may be
/// absent or `null`; `skipped` defaults to `false` for export schemas that
/// omit the flag.
fn event_from_record(index: usize, record: &Value) -> Result<PlaybackEvent> {
    let ts = require_str(index, record, "ts")?;
    let timestamp =
        parse_event_timestamp(ts).ok_or(HistoryError::MalformedEvent { index, field: "ts" })?;

    // `as_u64` rejects negative and fractional values along with non-numbers.
    let ms_played = record
        .get("ms_played")
        .and_then(Value::as_u64)
        .ok_or(HistoryError::MalformedEvent {
            index,
            field: "ms_played",
        })?;

    Ok(PlaybackEvent {
        timestamp,
        ms_played,
        track_name: optional_str(record, "master_metadata_track_name"),
        artist_name: optional_str(record, "master_metadata_album_artist_name"),
        platform: require_str(index, record, "platform")?.to_string(),
        ip_address: optional_str(record, "ip_addr_decrypted"),
        reason_start: require_str(index, record, "reason_start")?.to_string(),
        reason_end: require_str(index, record, "reason_end")?.to_string(),
        skipped: record
            .get("skipped")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn require_str<'a>(index: usize, record: &'a Value, field: &'static str) -> Result<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or(HistoryError::MalformedEvent { index, field })
}

fn optional_str(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(Value::as_str).map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
