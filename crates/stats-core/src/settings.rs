use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::time_utils::parse_period_key;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics for music streaming-history exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "stream-stats",
    about = "Descriptive statistics for music streaming-history exports",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear_config: bool,
}

/// The three tools this binary bundles.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute one report over a streaming-history export file
    Analyze {
        /// Path to the JSON export file
        input: PathBuf,

        /// Report to compute
        #[arg(long, value_enum)]
        report: ReportKind,

        /// Number of entries shown by ranked reports
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// First period for compare-periods, YYYY-MM
        #[arg(long, value_parser = parse_period_key)]
        period_a: Option<String>,

        /// Second period for compare-periods, YYYY-MM
        #[arg(long, value_parser = parse_period_key)]
        period_b: Option<String>,
    },

    /// Merge a directory of export files into one file sorted by timestamp
    Merge {
        /// Directory containing JSON export files
        input_dir: PathBuf,

        /// Path of the merged output file
        output: PathBuf,
    },

    /// Export one spreadsheet row per event as CSV
    Export {
        /// Path to the JSON export file
        input: PathBuf,

        /// Output path (default: `<input-stem>_History.csv` beside the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Closed set of reports the engine can compute.
///
/// Dispatch happens through an exhaustive `match` in the presenter, so a new
/// variant here will not compile until every consumer handles it.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Number of events in the export
    TotalCount,
    /// Total listen time as days/hours/minutes/seconds
    ListenTime,
    /// Mean playback duration in minutes
    AverageDuration,
    /// Most played tracks
    TopTracks,
    /// Most played artists
    TopArtists,
    /// Most skipped tracks
    MostSkipped,
    /// Play counts per device/platform
    Devices,
    /// Play counts per start/end reason
    Reasons,
    /// Play counts per year-month period
    Periods,
    /// Play counts of two periods and their difference
    ComparePeriods,
    /// Play counts per calendar date
    DailyPattern,
    /// Play counts per year
    Yearly,
    /// Total listening hours per weekday, Monday first
    WeekdayPlaytime,
    /// First and last event in file order
    FirstLast,
    /// Playback seconds per event, histogrammed
    Distribution,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.stream-stats/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".stream-stats").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation. Accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        let mut settings = Settings::parse_from(args);

        if settings.clear_config {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);
        let previous_top = last.top;

        // CLI always wins; persisted values only fill in defaults.
        if !is_arg_explicitly_set(&matches, "log_level") {
            if let Some(v) = last.log_level {
                settings.log_level = v;
            }
        }
        if let Some(Command::Analyze { top, .. }) = &mut settings.command {
            let explicit = matches
                .subcommand_matches("analyze")
                .map(|m| is_arg_explicitly_set(m, "top"))
                .unwrap_or(false);
            if !explicit {
                if let Some(v) = previous_top {
                    *top = v;
                }
            }
        }

        // Persist before the --debug override so a one-off debug run does not
        // become the sticky default.
        let params = LastUsedParams {
            top: match &settings.command {
                Some(Command::Analyze { top, .. }) => Some(*top),
                _ => previous_top,
            },
            log_level: Some(settings.log_level.clone()),
        };
        let _ = params.save_to(config_path);

        Self::apply_debug(settings)
    }

    /// `--debug` overrides the log level for this run only.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
