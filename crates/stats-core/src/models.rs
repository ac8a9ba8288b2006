use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;

/// Placeholder counted in place of an absent track or artist name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single playback record from a streaming-history export.
///
/// Built once by the loader, which validates every required field and the
/// timestamp layout; reports never have to re-check field presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackEvent {
    /// UTC timestamp when playback started.
    pub timestamp: DateTime<Utc>,
    /// Milliseconds of the track actually played.
    pub ms_played: u64,
    /// Track title; `None` when the export carries `null`.
    pub track_name: Option<String>,
    /// Artist name; `None` when the export carries `null`.
    pub artist_name: Option<String>,
    /// Device/platform label the playback happened on.
    pub platform: String,
    /// Decrypted IP address, when present in the export.
    pub ip_address: Option<String>,
    /// Why playback started. Free-form service string, not a closed set.
    pub reason_start: String,
    /// Why playback ended.
    pub reason_end: String,
    /// Whether the user skipped the track. Absent in some export schemas and
    /// then treated as `false`.
    pub skipped: bool,
}

impl PlaybackEvent {
    /// Track title, substituting [`UNKNOWN_LABEL`] for absent names.
    pub fn track_label(&self) -> &str {
        self.track_name.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// Artist name, substituting [`UNKNOWN_LABEL`] for absent names.
    pub fn artist_label(&self) -> &str {
        self.artist_name.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// Year-month bucket key, `"YYYY-MM"`.
    pub fn period_key(&self) -> String {
        self.timestamp.format("%Y-%m").to_string()
    }

    /// Calendar date of the playback.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Calendar year of the playback.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Weekday of the playback.
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Played duration in seconds.
    pub fn seconds_played(&self) -> f64 {
        self.ms_played as f64 / 1000.0
    }

    /// Played duration in minutes.
    pub fn minutes_played(&self) -> f64 {
        self.ms_played as f64 / 60_000.0
    }

    /// Played duration in hours.
    pub fn hours_played(&self) -> f64 {
        self.ms_played as f64 / 3_600_000.0
    }
}

// ── ListenTime ────────────────────────────────────────────────────────────────

/// A millisecond total decomposed into days, hours, minutes and seconds.
///
/// Components truncate rather than round; `hours` is in `[0, 24)`, `minutes`
/// and `seconds` in `[0, 60)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ListenTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ListenTime {
    /// Decompose `ms` by repeated floor division (1000, 60, 60, 24).
    pub fn from_millis(ms: u64) -> Self {
        let total_seconds = ms / 1000;
        let total_minutes = total_seconds / 60;
        let total_hours = total_minutes / 60;
        Self {
            days: total_hours / 24,
            hours: total_hours % 24,
            minutes: total_minutes % 60,
            seconds: total_seconds % 60,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
