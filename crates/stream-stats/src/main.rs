mod bootstrap;
mod export;
mod report;

use anyhow::Result;
use clap::CommandFactory;
use stats_core::settings::{Command, Settings};
use stats_data::loader::load_events;
use stats_data::merge::merge_history_files;

use crate::report::ReportOptions;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("stream-stats v{} starting", env!("CARGO_PKG_VERSION"));

    let Some(command) = settings.command else {
        Settings::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Analyze {
            input,
            report,
            top,
            period_a,
            period_b,
        } => {
            let events = load_events(&input)?;
            tracing::info!("Loaded {} events from {}", events.len(), input.display());

            let options = ReportOptions {
                top,
                period_a,
                period_b,
            };
            let rendered = report::run_report(report, &events, &options)?;
            println!("{rendered}");
        }

        Command::Merge { input_dir, output } => {
            let summary = merge_history_files(&input_dir, &output)?;
            println!(
                "Merged {} records from {} files into {} ({} skipped)",
                summary.records,
                summary.files_merged,
                output.display(),
                summary.files_skipped
            );
        }

        Command::Export { input, output } => {
            let events = load_events(&input)?;
            let written = export::export_history_csv(&events, &input, output.as_deref())?;
            println!("Exported {} rows to {}", events.len(), written.display());
        }
    }

    Ok(())
}
