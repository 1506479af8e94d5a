//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `table_loader` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing summary output and exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use table_loader::initialization::init_logger_with;
use table_loader::{run_load, Config, LoadReport, LogFormat};

/// Maps a finished run to the process exit code.
///
/// 0 on full success, 2 when some records failed to load, 1 when a fatal
/// error stopped the run.
fn evaluate_exit_code(report: &LoadReport) -> i32 {
    if report.aborted.is_some() {
        1
    } else if report.records_failed > 0 {
        2
    } else {
        0
    }
}

/// Prints the end-of-run summary, matching the configured log format.
fn print_summary(report: &LoadReport, format: &LogFormat) {
    match format {
        LogFormat::Json => match serde_json::to_string(report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize summary: {e}"),
        },
        LogFormat::Plain => {
            println!(
                "✅ Processed {} record{} ({} written, {} skipped, {} failed) in {:.1}s",
                report.records_read,
                if report.records_read == 1 { "" } else { "s" },
                report.records_written,
                report.records_skipped,
                report.records_failed,
                report.elapsed_seconds
            );
            if !report.failed_keys.is_empty() {
                println!("Failed keys: {}", report.failed_keys.join(", "));
            }
            if let Some(cause) = &report.aborted {
                println!("⚠️ Run stopped early: {cause}");
            }
            println!(
                "Results stored in table '{}' in {}",
                report.table,
                report.db_path.display()
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format.clone())
        .context("Failed to initialize logger")?;

    // Run the load using the library
    match run_load(config).await {
        Ok(report) => {
            // The summary counts are always emitted, even on partial
            // failure, so callers can assess load completeness
            print_summary(&report, &log_format);
            let code = evaluate_exit_code(&report);
            if code != 0 {
                process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("table_loader error: {:#}", e);
            process::exit(1);
        }
    }
}
