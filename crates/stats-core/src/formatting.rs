use crate::models::ListenTime;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Render a [`ListenTime`] in the long form used by the listen-time report.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_listen_time;
/// use stats_core::models::ListenTime;
///
/// let t = ListenTime::from_millis(90_061_000);
/// assert_eq!(format_listen_time(&t), "1 days, 1 hours, 1 minutes, 1 seconds");
/// ```
pub fn format_listen_time(t: &ListenTime) -> String {
    format!(
        "{} days, {} hours, {} minutes, {} seconds",
        t.days, t.hours, t.minutes, t.seconds
    )
}

/// Fixed two-decimal rendering for minute values.
pub fn format_minutes(minutes: f64) -> String {
    format!("{minutes:.2}")
}

/// Fixed two-decimal rendering for hour values.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// `(part / whole) * 100`, rounded to one decimal place.
///
/// Returns `0.0` when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
