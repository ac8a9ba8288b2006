//! Pure aggregation reports over a loaded event list.
//!
//! Every function here is stateless and side-effect free: output depends only
//! on the given slice, so reports can be recomputed in any order. Functions
//! documented as "input order" (`first_and_last`, the distribution sequence)
//! preserve the order events had in the export file; everything else is
//! order-independent.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Weekday};
use stats_core::error::{HistoryError, Result};
use stats_core::models::{ListenTime, PlaybackEvent};
use stats_core::time_utils::WEEK_ORDER;

// ── Report inputs ─────────────────────────────────────────────────────────────

/// Which event field a ranked report groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    /// Group by track title.
    Track,
    /// Group by artist name.
    Artist,
}

// ── StatsEngine ───────────────────────────────────────────────────────────────

/// Stateless engine computing reports from an event list.
pub struct StatsEngine;

impl StatsEngine {
    /// Number of events. Zero for an empty list.
    pub fn total_count(events: &[PlaybackEvent]) -> usize {
        events.len()
    }

    /// Sum of `ms_played` decomposed into days, hours, minutes and seconds.
    pub fn total_listen_time(events: &[PlaybackEvent]) -> ListenTime {
        ListenTime::from_millis(events.iter().map(|e| e.ms_played).sum())
    }

    /// Mean playback duration in minutes.
    ///
    /// Fails with [`HistoryError::InsufficientData`] on an empty list rather
    /// than dividing by zero.
    pub fn average_duration_minutes(events: &[PlaybackEvent]) -> Result<f64> {
        if events.is_empty() {
            return Err(HistoryError::InsufficientData("average duration"));
        }
        let total_ms: u64 = events.iter().map(|e| e.ms_played).sum();
        Ok(total_ms as f64 / events.len() as f64 / 60_000.0)
    }

    /// Top `n` values of `field` by play count, descending.
    ///
    /// Absent track/artist names are counted under `"Unknown"`. Equal counts
    /// keep first-seen order, so results are deterministic for a fixed input.
    pub fn top_by_field(
        events: &[PlaybackEvent],
        field: RankField,
        n: usize,
    ) -> Vec<(String, u64)> {
        let labels = events.iter().map(|e| match field {
            RankField::Track => e.track_label(),
            RankField::Artist => e.artist_label(),
        });
        let mut ranked = rank_descending(count_first_seen(labels));
        ranked.truncate(n);
        ranked
    }

    /// Top `n` most skipped tracks, restricted to events with the skip flag.
    ///
    /// Export schemas without the flag produce no skipped events, which is an
    /// empty report rather than an error.
    pub fn most_skipped(events: &[PlaybackEvent], n: usize) -> Vec<(String, u64)> {
        let labels = events
            .iter()
            .filter(|e| e.skipped)
            .map(|e| e.track_label());
        let mut ranked = rank_descending(count_first_seen(labels));
        ranked.truncate(n);
        ranked
    }

    /// Play counts per device/platform, count descending, ties in first-seen
    /// order. Counts sum to [`total_count`](Self::total_count).
    pub fn device_breakdown(events: &[PlaybackEvent]) -> Vec<(String, u64)> {
        rank_descending(count_first_seen(
            events.iter().map(|e| e.platform.as_str()),
        ))
    }

    /// Play counts per start reason and per end reason, each in
    /// first-occurrence order.
    pub fn reason_breakdown(
        events: &[PlaybackEvent],
    ) -> (Vec<(String, u64)>, Vec<(String, u64)>) {
        (
            count_first_seen(events.iter().map(|e| e.reason_start.as_str())),
            count_first_seen(events.iter().map(|e| e.reason_end.as_str())),
        )
    }

    /// Play counts bucketed by year-month, keyed `"YYYY-MM"`.
    pub fn period_counts(events: &[PlaybackEvent]) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for event in events {
            *counts.entry(event.period_key()).or_insert(0) += 1;
        }
        counts
    }

    /// Play counts for two period keys plus their absolute difference.
    ///
    /// A period with no events yields 0, never an error.
    pub fn compare_periods(
        events: &[PlaybackEvent],
        period_a: &str,
        period_b: &str,
    ) -> (u64, u64, u64) {
        let counts = Self::period_counts(events);
        let count_a = counts.get(period_a).copied().unwrap_or(0);
        let count_b = counts.get(period_b).copied().unwrap_or(0);
        (count_a, count_b, count_a.abs_diff(count_b))
    }

    /// Play counts per calendar date, sorted by date ascending.
    pub fn daily_pattern(events: &[PlaybackEvent]) -> Vec<(NaiveDate, u64)> {
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for event in events {
            *counts.entry(event.date()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Play counts per year, sorted by year ascending.
    pub fn yearly_statistics(events: &[PlaybackEvent]) -> BTreeMap<i32, u64> {
        let mut counts = BTreeMap::new();
        for event in events {
            *counts.entry(event.year()).or_insert(0) += 1;
        }
        counts
    }

    /// Total listening hours per weekday, always Monday through Sunday.
    ///
    /// Weekdays without any plays are present with 0.0 hours.
    pub fn daily_playtime_by_weekday(events: &[PlaybackEvent]) -> Vec<(Weekday, f64)> {
        let mut hours: HashMap<Weekday, f64> = HashMap::new();
        for event in events {
            *hours.entry(event.weekday()).or_insert(0.0) += event.hours_played();
        }
        WEEK_ORDER
            .iter()
            .map(|day| (*day, hours.get(day).copied().unwrap_or(0.0)))
            .collect()
    }

    /// First and last event in input order, not necessarily chronological.
    ///
    /// Callers wanting chronological endpoints must sort beforehand (the
    /// merge utility produces such files).
    pub fn first_and_last(
        events: &[PlaybackEvent],
    ) -> Result<(&PlaybackEvent, &PlaybackEvent)> {
        match (events.first(), events.last()) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(HistoryError::InsufficientData("first and last event")),
        }
    }

    /// Playback seconds per event, in input order. Binning is left to the
    /// presenter.
    pub fn playback_time_distribution(events: &[PlaybackEvent]) -> Vec<f64> {
        events.iter().map(|e| e.seconds_played()).collect()
    }
}

// ── Counting helpers ──────────────────────────────────────────────────────────

/// Count occurrences of each label, remembering first-seen order.
fn count_first_seen<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for label in labels {
        match counts.entry(label) {
            Entry::Occupied(mut occupied) => *occupied.get_mut() += 1,
            Entry::Vacant(vacant) => {
                vacant.insert(1);
                order.push(label);
            }
        }
    }
    order
        .into_iter()
        .map(|label| (label.to_string(), counts[label]))
        .collect()
}

/// Sort a first-seen count list by count descending.
///
/// `sort_by` is stable, so equal counts retain their first-seen order.
fn rank_descending(mut counted: Vec<(String, u64)>) -> Vec<(String, u64)> {
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::time_utils::parse_event_timestamp;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn event(ts: &str, ms: u64) -> PlaybackEvent {
        PlaybackEvent {
            timestamp: parse_event_timestamp(ts).expect("test timestamp"),
            ms_played: ms,
            track_name: None,
            artist_name: None,
            platform: "ios".to_string(),
            ip_address: None,
            reason_start: "clickrow".to_string(),
            reason_end: "trackdone".to_string(),
            skipped: false,
        }
    }

    fn with_track(ts: &str, track: Option<&str>) -> PlaybackEvent {
        PlaybackEvent {
            track_name: track.map(str::to_string),
            ..event(ts, 1_000)
        }
    }

    fn with_artist(ts: &str, artist: &str) -> PlaybackEvent {
        PlaybackEvent {
            artist_name: Some(artist.to_string()),
            ..event(ts, 1_000)
        }
    }

    fn with_platform(ts: &str, platform: &str) -> PlaybackEvent {
        PlaybackEvent {
            platform: platform.to_string(),
            ..event(ts, 1_000)
        }
    }

    fn skipped_track(ts: &str, track: &str) -> PlaybackEvent {
        PlaybackEvent {
            skipped: true,
            ..with_track(ts, Some(track))
        }
    }

    const TS: &str = "2023-01-15T10:00:00Z";

    // ── total_count ───────────────────────────────────────────────────────────

    #[test]
    fn test_total_count() {
        assert_eq!(StatsEngine::total_count(&[]), 0);
        let events = vec![event(TS, 1), event(TS, 2), event(TS, 3)];
        assert_eq!(StatsEngine::total_count(&events), 3);
    }

    // ── total_listen_time ─────────────────────────────────────────────────────

    #[test]
    fn test_total_listen_time_decomposition() {
        // Values summing to exactly 90,061,000 ms: 1d 1h 1m 1s.
        let events = vec![event(TS, 90_000_000), event(TS, 60_000), event(TS, 1_000)];
        let t = StatsEngine::total_listen_time(&events);
        assert_eq!((t.days, t.hours, t.minutes, t.seconds), (1, 1, 1, 1));
    }

    #[test]
    fn test_total_listen_time_empty() {
        assert_eq!(StatsEngine::total_listen_time(&[]), ListenTime::default());
    }

    // ── average_duration_minutes ──────────────────────────────────────────────

    #[test]
    fn test_average_duration_empty_fails() {
        let err = StatsEngine::average_duration_minutes(&[]).unwrap_err();
        assert!(matches!(err, HistoryError::InsufficientData(_)));
    }

    #[test]
    fn test_average_duration_single_event() {
        let events = vec![event(TS, 120_000)];
        let avg = StatsEngine::average_duration_minutes(&events).unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_duration_mean() {
        let events = vec![event(TS, 60_000), event(TS, 180_000)];
        let avg = StatsEngine::average_duration_minutes(&events).unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
    }

    // ── top_by_field ──────────────────────────────────────────────────────────

    #[test]
    fn test_top_by_field_ordering() {
        // A A B C A B → [(A,3), (B,2), (C,1)].
        let events: Vec<_> = ["A", "A", "B", "C", "A", "B"]
            .iter()
            .map(|t| with_track(TS, Some(t)))
            .collect();

        let top = StatsEngine::top_by_field(&events, RankField::Track, 5);
        assert_eq!(
            top,
            vec![
                ("A".to_string(), 3),
                ("B".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_by_field_unknown_substitution() {
        let events = vec![
            with_track(TS, None),
            with_track(TS, None),
            with_track(TS, Some("X")),
        ];
        let top = StatsEngine::top_by_field(&events, RankField::Track, 5);
        assert_eq!(
            top,
            vec![("Unknown".to_string(), 2), ("X".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_by_field_truncates_to_n() {
        let events: Vec<_> = ["A", "B", "C", "D"]
            .iter()
            .map(|t| with_track(TS, Some(t)))
            .collect();
        assert_eq!(StatsEngine::top_by_field(&events, RankField::Track, 2).len(), 2);
    }

    #[test]
    fn test_top_by_field_ties_first_seen() {
        let events: Vec<_> = ["B", "A", "B", "A"]
            .iter()
            .map(|t| with_track(TS, Some(t)))
            .collect();
        let top = StatsEngine::top_by_field(&events, RankField::Track, 5);
        // Equal counts: B was seen first.
        assert_eq!(top[0].0, "B");
        assert_eq!(top[1].0, "A");
    }

    #[test]
    fn test_top_by_field_artists() {
        let events = vec![
            with_artist(TS, "Artist 1"),
            with_artist(TS, "Artist 1"),
            with_artist(TS, "Artist 2"),
        ];
        let top = StatsEngine::top_by_field(&events, RankField::Artist, 5);
        assert_eq!(top[0], ("Artist 1".to_string(), 2));
    }

    // ── most_skipped ──────────────────────────────────────────────────────────

    #[test]
    fn test_most_skipped_counts_only_flagged() {
        let events = vec![
            skipped_track(TS, "S"),
            skipped_track(TS, "S"),
            with_track(TS, Some("S")),
            with_track(TS, Some("Kept")),
        ];
        let skipped = StatsEngine::most_skipped(&events, 5);
        assert_eq!(skipped, vec![("S".to_string(), 2)]);
    }

    #[test]
    fn test_most_skipped_empty_without_flags() {
        let events = vec![with_track(TS, Some("A")), with_track(TS, Some("B"))];
        assert!(StatsEngine::most_skipped(&events, 5).is_empty());
    }

    // ── device_breakdown ──────────────────────────────────────────────────────

    #[test]
    fn test_device_breakdown_sums_to_total() {
        let events = vec![
            with_platform(TS, "ios"),
            with_platform(TS, "android"),
            with_platform(TS, "ios"),
            with_platform(TS, "web player"),
        ];
        let breakdown = StatsEngine::device_breakdown(&events);
        let sum: u64 = breakdown.iter().map(|(_, c)| c).sum();
        assert_eq!(sum as usize, StatsEngine::total_count(&events));
        assert_eq!(breakdown[0], ("ios".to_string(), 2));
    }

    // ── reason_breakdown ──────────────────────────────────────────────────────

    #[test]
    fn test_reason_breakdown_first_occurrence_order() {
        let mut events = vec![event(TS, 1), event(TS, 1), event(TS, 1)];
        events[0].reason_start = "clickrow".to_string();
        events[1].reason_start = "fwdbtn".to_string();
        events[2].reason_start = "clickrow".to_string();
        events[0].reason_end = "trackdone".to_string();
        events[1].reason_end = "endplay".to_string();
        events[2].reason_end = "endplay".to_string();

        let (start, end) = StatsEngine::reason_breakdown(&events);
        assert_eq!(
            start,
            vec![("clickrow".to_string(), 2), ("fwdbtn".to_string(), 1)]
        );
        assert_eq!(
            end,
            vec![("trackdone".to_string(), 1), ("endplay".to_string(), 2)]
        );
    }

    #[test]
    fn test_reason_breakdown_sums_to_total() {
        let events = vec![event(TS, 1), event(TS, 1), event(TS, 1)];
        let (start, end) = StatsEngine::reason_breakdown(&events);
        let start_sum: u64 = start.iter().map(|(_, c)| c).sum();
        let end_sum: u64 = end.iter().map(|(_, c)| c).sum();
        assert_eq!(start_sum, 3);
        assert_eq!(end_sum, 3);
    }

    // ── period_counts / compare_periods ───────────────────────────────────────

    #[test]
    fn test_period_counts_buckets_by_month() {
        let events = vec![
            event("2023-01-05T00:00:00Z", 1),
            event("2023-01-20T00:00:00Z", 1),
            event("2023-02-01T00:00:00Z", 1),
        ];
        let counts = StatsEngine::period_counts(&events);
        assert_eq!(counts.get("2023-01"), Some(&2));
        assert_eq!(counts.get("2023-02"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_compare_periods_missing_period_is_zero() {
        let events = vec![
            event("2023-01-05T00:00:00Z", 1),
            event("2023-01-20T00:00:00Z", 1),
        ];
        let (a, b, diff) = StatsEngine::compare_periods(&events, "2023-01", "2023-02");
        assert_eq!((a, b, diff), (2, 0, 2));
    }

    #[test]
    fn test_compare_periods_empty_events() {
        let (a, b, diff) = StatsEngine::compare_periods(&[], "2023-01", "2023-02");
        assert_eq!((a, b, diff), (0, 0, 0));
    }

    // ── daily_pattern ─────────────────────────────────────────────────────────

    #[test]
    fn test_daily_pattern_sorted_ascending() {
        let events = vec![
            event("2023-01-20T08:00:00Z", 1),
            event("2023-01-10T08:00:00Z", 1),
            event("2023-01-10T20:00:00Z", 1),
        ];
        let pattern = StatsEngine::daily_pattern(&events);
        assert_eq!(pattern.len(), 2);
        assert_eq!(
            pattern[0],
            (NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(), 2)
        );
        assert_eq!(
            pattern[1],
            (NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(), 1)
        );
    }

    // ── yearly_statistics ─────────────────────────────────────────────────────

    #[test]
    fn test_yearly_statistics() {
        let events = vec![
            event("2022-12-31T23:59:59Z", 1),
            event("2023-01-01T00:00:00Z", 1),
            event("2023-06-15T12:00:00Z", 1),
        ];
        let years = StatsEngine::yearly_statistics(&events);
        let collected: Vec<_> = years.into_iter().collect();
        assert_eq!(collected, vec![(2022, 1), (2023, 2)]);
    }

    // ── daily_playtime_by_weekday ─────────────────────────────────────────────

    #[test]
    fn test_weekday_playtime_order_fixed() {
        // Input deliberately out of week order: Sunday first, then Monday.
        let events = vec![
            event("2023-01-15T10:00:00Z", 3_600_000), // Sunday, 1h
            event("2023-01-16T10:00:00Z", 1_800_000), // Monday, 0.5h
        ];
        let playtime = StatsEngine::daily_playtime_by_weekday(&events);
        assert_eq!(playtime.len(), 7);
        assert_eq!(playtime[0].0, Weekday::Mon);
        assert!((playtime[0].1 - 0.5).abs() < 1e-9);
        assert_eq!(playtime[6].0, Weekday::Sun);
        assert!((playtime[6].1 - 1.0).abs() < 1e-9);
        // Days with no plays are present with zero hours.
        assert_eq!(playtime[2].1, 0.0);
    }

    #[test]
    fn test_weekday_playtime_empty() {
        let playtime = StatsEngine::daily_playtime_by_weekday(&[]);
        assert_eq!(playtime.len(), 7);
        assert!(playtime.iter().all(|(_, h)| *h == 0.0));
    }

    // ── first_and_last ────────────────────────────────────────────────────────

    #[test]
    fn test_first_and_last_input_order() {
        // e1 has the latest timestamp but is still "first" by input order.
        let events = vec![
            with_track("2023-06-01T00:00:00Z", Some("e1")),
            with_track("2023-01-01T00:00:00Z", Some("e2")),
            with_track("2023-03-01T00:00:00Z", Some("e3")),
        ];
        let (first, last) = StatsEngine::first_and_last(&events).unwrap();
        assert_eq!(first.track_name.as_deref(), Some("e1"));
        assert_eq!(last.track_name.as_deref(), Some("e3"));
    }

    #[test]
    fn test_first_and_last_empty_fails() {
        let err = StatsEngine::first_and_last(&[]).unwrap_err();
        assert!(matches!(err, HistoryError::InsufficientData(_)));
    }

    #[test]
    fn test_first_and_last_single_event() {
        let events = vec![event(TS, 1)];
        let (first, last) = StatsEngine::first_and_last(&events).unwrap();
        assert_eq!(first, last);
    }

    // ── playback_time_distribution ────────────────────────────────────────────

    #[test]
    fn test_distribution_preserves_order() {
        let events = vec![event(TS, 30_000), event(TS, 1_000), event(TS, 245_500)];
        let seconds = StatsEngine::playback_time_distribution(&events);
        assert_eq!(seconds, vec![30.0, 1.0, 245.5]);
    }

    #[test]
    fn test_distribution_empty() {
        assert!(StatsEngine::playback_time_distribution(&[]).is_empty());
    }
}
