//! Text presenter for every report kind.
//!
//! The engine returns plain structured values; everything string-shaped
//! happens here. `run_report` is the single dispatch point: an exhaustive
//! `match` over [`ReportKind`], so adding a report kind will not compile
//! until it is rendered.

use anyhow::{bail, Result};
use stats_core::formatting::{
    format_count, format_hours, format_listen_time, format_minutes, percentage,
};
use stats_core::models::PlaybackEvent;
use stats_core::settings::ReportKind;
use stats_core::time_utils::weekday_name;
use stats_data::engine::{RankField, StatsEngine};

const NO_DATA: &str = "No events loaded.";

/// Per-invocation report options from the CLI.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Entry count for ranked reports.
    pub top: usize,
    /// First period key for compare-periods.
    pub period_a: Option<String>,
    /// Second period key for compare-periods.
    pub period_b: Option<String>,
}

/// Compute and render `kind` over `events`.
pub fn run_report(
    kind: ReportKind,
    events: &[PlaybackEvent],
    options: &ReportOptions,
) -> Result<String> {
    let text = match kind {
        ReportKind::TotalCount => render_total_count(events),
        ReportKind::ListenTime => render_listen_time(events),
        ReportKind::AverageDuration => render_average_duration(events)?,
        ReportKind::TopTracks => render_ranked(
            "most played tracks",
            StatsEngine::top_by_field(events, RankField::Track, options.top),
        ),
        ReportKind::TopArtists => render_ranked(
            "most played artists",
            StatsEngine::top_by_field(events, RankField::Artist, options.top),
        ),
        ReportKind::MostSkipped => render_ranked(
            "most skipped tracks",
            StatsEngine::most_skipped(events, options.top),
        ),
        ReportKind::Devices => render_devices(events),
        ReportKind::Reasons => render_reasons(events),
        ReportKind::Periods => render_periods(events),
        ReportKind::ComparePeriods => render_compare_periods(events, options)?,
        ReportKind::DailyPattern => render_daily_pattern(events),
        ReportKind::Yearly => render_yearly(events),
        ReportKind::WeekdayPlaytime => render_weekday_playtime(events),
        ReportKind::FirstLast => render_first_last(events)?,
        ReportKind::Distribution => render_distribution(events),
    };
    Ok(text)
}

// ── Renderers ─────────────────────────────────────────────────────────────────

fn render_total_count(events: &[PlaybackEvent]) -> String {
    format!(
        "Total number of songs listened: {}",
        format_count(StatsEngine::total_count(events) as u64)
    )
}

fn render_listen_time(events: &[PlaybackEvent]) -> String {
    format!(
        "Total time spent listening: {}",
        format_listen_time(&StatsEngine::total_listen_time(events))
    )
}

fn render_average_duration(events: &[PlaybackEvent]) -> Result<String> {
    let minutes = StatsEngine::average_duration_minutes(events)?;
    Ok(format!(
        "Average song duration: {} minutes",
        format_minutes(minutes)
    ))
}

fn render_ranked(label: &str, ranked: Vec<(String, u64)>) -> String {
    if ranked.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = format!("Top {} {}:\n", ranked.len(), label);
    for (position, (name, plays)) in ranked.iter().enumerate() {
        out.push_str(&format!("{}. {}: {} plays\n", position + 1, name, plays));
    }
    out.trim_end().to_string()
}

fn render_devices(events: &[PlaybackEvent]) -> String {
    let breakdown = StatsEngine::device_breakdown(events);
    if breakdown.is_empty() {
        return NO_DATA.to_string();
    }
    let total = StatsEngine::total_count(events) as u64;
    let mut out = String::from("Most used devices:\n");
    for (platform, plays) in &breakdown {
        out.push_str(&format!(
            "{}: {} plays ({}%)\n",
            platform,
            plays,
            percentage(*plays, total)
        ));
    }
    out.trim_end().to_string()
}

fn render_reasons(events: &[PlaybackEvent]) -> String {
    let (start, end) = StatsEngine::reason_breakdown(events);
    if start.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::from("Playback start reasons:\n");
    for (reason, count) in &start {
        out.push_str(&format!("{reason}: {count} times\n"));
    }
    out.push_str("\nPlayback end reasons:\n");
    for (reason, count) in &end {
        out.push_str(&format!("{reason}: {count} times\n"));
    }
    out.trim_end().to_string()
}

fn render_periods(events: &[PlaybackEvent]) -> String {
    let counts = StatsEngine::period_counts(events);
    if counts.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::from("Plays per period:\n");
    for (period, count) in &counts {
        out.push_str(&format!("{period}: {count} plays\n"));
    }
    out.trim_end().to_string()
}

fn render_compare_periods(events: &[PlaybackEvent], options: &ReportOptions) -> Result<String> {
    let (Some(period_a), Some(period_b)) =
        (options.period_a.as_deref(), options.period_b.as_deref())
    else {
        bail!("compare-periods requires --period-a and --period-b");
    };
    let (count_a, count_b, diff) = StatsEngine::compare_periods(events, period_a, period_b);
    Ok(format!(
        "Plays in {period_a}: {count_a}\nPlays in {period_b}: {count_b}\nDifference: {diff} plays"
    ))
}

fn render_daily_pattern(events: &[PlaybackEvent]) -> String {
    let pattern = StatsEngine::daily_pattern(events);
    if pattern.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::from("Plays per day:\n");
    for (date, count) in &pattern {
        out.push_str(&format!("{date}: {count} plays\n"));
    }
    out.trim_end().to_string()
}

fn render_yearly(events: &[PlaybackEvent]) -> String {
    let years = StatsEngine::yearly_statistics(events);
    if years.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::from("Plays per year:\n");
    for (year, count) in &years {
        out.push_str(&format!("{year}: {count} plays\n"));
    }
    out.trim_end().to_string()
}

fn render_weekday_playtime(events: &[PlaybackEvent]) -> String {
    let mut out = String::from("Listening hours per weekday:\n");
    for (day, hours) in StatsEngine::daily_playtime_by_weekday(events) {
        out.push_str(&format!("{}: {} hours\n", weekday_name(day), format_hours(hours)));
    }
    out.trim_end().to_string()
}

fn render_first_last(events: &[PlaybackEvent]) -> Result<String> {
    let (first, last) = StatsEngine::first_and_last(events)?;
    Ok(format!(
        "First event (file order): {}\nLast event (file order): {}",
        describe_event(first),
        describe_event(last)
    ))
}

fn describe_event(event: &PlaybackEvent) -> String {
    format!(
        "{} | {} by {} on {}",
        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.track_label(),
        event.artist_label(),
        event.platform
    )
}

/// Histogram of playback seconds: 20 bins between the observed minimum and
/// maximum, bars scaled to at most 40 columns.
fn render_distribution(events: &[PlaybackEvent]) -> String {
    const BINS: usize = 20;
    const BAR_WIDTH: f64 = 40.0;

    let seconds = StatsEngine::playback_time_distribution(events);
    if seconds.is_empty() {
        return NO_DATA.to_string();
    }

    let min = seconds.iter().copied().fold(f64::INFINITY, f64::min);
    let max = seconds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(f64::EPSILON);

    let mut bins = [0u64; BINS];
    for value in &seconds {
        let index = (((value - min) / span) * BINS as f64) as usize;
        bins[index.min(BINS - 1)] += 1;
    }
    let tallest = bins.iter().copied().max().unwrap_or(1).max(1);

    let mut out = format!(
        "Playback time distribution ({} events, {:.1}s to {:.1}s):\n",
        seconds.len(),
        min,
        max
    );
    let bin_width = span / BINS as f64;
    for (i, count) in bins.iter().enumerate() {
        let low = min + bin_width * i as f64;
        let high = low + bin_width;
        let bar_len = ((*count as f64 / tallest as f64) * BAR_WIDTH).round() as usize;
        out.push_str(&format!(
            "{:>7.1}-{:<7.1} {:>5} {}\n",
            low,
            high,
            count,
            "#".repeat(bar_len)
        ));
    }
    out.trim_end().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
