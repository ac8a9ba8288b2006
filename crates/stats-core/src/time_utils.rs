use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use regex::Regex;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Exact timestamp layout used by the export: UTC with a literal `Z` suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp into a UTC [`DateTime`].
///
/// Strict by design: offsets, fractional seconds or a missing `Z` are
/// rejected so that a bad record fails validation instead of being coerced.
pub fn parse_event_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

// ── Period keys ───────────────────────────────────────────────────────────────

static PERIOD_KEY_RE: OnceLock<Regex> = OnceLock::new();

/// Whether `s` is a well-formed `YYYY-MM` period key with a real month.
pub fn is_valid_period_key(s: &str) -> bool {
    let re = PERIOD_KEY_RE
        .get_or_init(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("literal regex"));
    re.is_match(s)
}

/// clap value parser for period arguments.
pub fn parse_period_key(s: &str) -> Result<String, String> {
    if is_valid_period_key(s) {
        Ok(s.to_string())
    } else {
        Err(format!("expected a period in YYYY-MM form, got \"{s}\""))
    }
}

// ── Weekdays ──────────────────────────────────────────────────────────────────

/// Calendar week order used by weekday reports, Monday first.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    // ── parse_event_timestamp ─────────────────────────────────────────────────

    #[test]
    fn test_parse_valid_timestamp() {
        let ts = parse_event_timestamp("2023-01-15T10:30:45Z").unwrap();
        assert_eq!(ts.year(), 2023);
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
        assert_eq!(ts.second(), 45);
    }

    #[test]
    fn test_parse_rejects_missing_z() {
        assert!(parse_event_timestamp("2023-01-15T10:30:45").is_none());
    }

    #[test]
    fn test_parse_rejects_offset_form() {
        assert!(parse_event_timestamp("2023-01-15T10:30:45+00:00").is_none());
    }

    #[test]
    fn test_parse_rejects_fractional_seconds() {
        assert!(parse_event_timestamp("2023-01-15T10:30:45.123Z").is_none());
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(parse_event_timestamp("").is_none());
        assert!(parse_event_timestamp("not a timestamp").is_none());
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(parse_event_timestamp("2023-02-30T00:00:00Z").is_none());
    }

    // ── period keys ───────────────────────────────────────────────────────────

    #[test]
    fn test_period_key_valid() {
        assert!(is_valid_period_key("2023-01"));
        assert!(is_valid_period_key("1999-12"));
    }

    #[test]
    fn test_period_key_invalid_month() {
        assert!(!is_valid_period_key("2023-00"));
        assert!(!is_valid_period_key("2023-13"));
    }

    #[test]
    fn test_period_key_invalid_shape() {
        assert!(!is_valid_period_key("2023-1"));
        assert!(!is_valid_period_key("2023/01"));
        assert!(!is_valid_period_key("23-01"));
        assert!(!is_valid_period_key(""));
    }

    #[test]
    fn test_parse_period_key_err_message() {
        let err = parse_period_key("2023-13").unwrap_err();
        assert!(err.contains("YYYY-MM"));
        assert!(err.contains("2023-13"));
    }

    // ── weekdays ──────────────────────────────────────────────────────────────

    #[test]
    fn test_week_order_monday_first() {
        assert_eq!(WEEK_ORDER[0], Weekday::Mon);
        assert_eq!(WEEK_ORDER[6], Weekday::Sun);
        assert_eq!(WEEK_ORDER.len(), 7);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
