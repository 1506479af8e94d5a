//! table_loader library: bulk delimited-text loading into a key-value table
//!
//! This library reads rows from a delimited text file, maps positional
//! columns to named fields through a fixed schema, and upserts the
//! resulting records into a key-value table in batches. Re-loading the same
//! input is idempotent: items sharing a primary-key value are replaced, not
//! duplicated.
//!
//! # Example
//!
//! ```no_run
//! use table_loader::{run_load, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: std::path::PathBuf::from("reports.csv"),
//!     table: "reports".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_load(config).await?;
//! println!("Loaded {} of {} records ({} skipped, {} failed)",
//!          report.records_written, report.records_read,
//!          report.records_skipped, report.records_failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod initialization;
mod loader;
pub mod schema;
pub mod source;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ErrorType, LoadError, LoadStats};
pub use loader::{LoadTally, Loader};
pub use run::{run_load, run_load_with_shutdown, LoadReport};
pub use schema::{Record, Schema, ShapeMismatch};

// Internal run module (contains the main loading logic)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use log::info;
    use serde::Serialize;
    use tokio_util::sync::CancellationToken;

    use crate::config::Config;
    use crate::error_handling::LoadStats;
    use crate::loader::Loader;
    use crate::schema::{Schema, ShapeMismatch};
    use crate::source::{count_data_rows, RecordSource};
    use crate::storage::batch::{BatchConfig, BatchWriter};
    use crate::storage::{init_db_pool_with_path, SqliteTableStore};

    /// Results of a completed load run.
    ///
    /// Counter invariants: `records_read + records_skipped` equals the
    /// number of input lines, and `records_written + records_failed ==
    /// records_read`. The counts are populated even when the run stopped
    /// early (`aborted` is then set to the cause).
    #[derive(Debug, Clone, Serialize)]
    pub struct LoadReport {
        /// Rows mapped to records and submitted for writing.
        pub records_read: usize,
        /// Records the store accepted.
        pub records_written: usize,
        /// Blank lines and malformed rows.
        pub records_skipped: usize,
        /// Records the store did not accept; their keys are in
        /// `failed_keys` so a caller may retry them.
        pub records_failed: usize,
        /// Primary-key values of the failed records.
        pub failed_keys: Vec<String>,
        /// Rows dropped for having fewer columns than the schema.
        pub shape_mismatches: Vec<ShapeMismatch>,
        /// Target table name.
        pub table: String,
        /// Path to the SQLite database holding the table.
        pub db_path: PathBuf,
        /// Elapsed time in seconds.
        pub elapsed_seconds: f64,
        /// Human-readable cause when a fatal error stopped the run early.
        pub aborted: Option<String>,
    }

    /// Converts a configured char to the single-byte form the parser needs.
    fn ascii_byte(c: char, what: &str) -> Result<u8> {
        if c.is_ascii() {
            Ok(c as u8)
        } else {
            bail!("{what} must be a single ASCII character, got {c:?}")
        }
    }

    /// Runs a load with the provided configuration.
    ///
    /// This is the main entry point for the library. It reads rows from the
    /// input file, maps them through the configured schema, and upserts
    /// them into the target table in batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the run could not start at all: the input cannot
    /// be opened, the store cannot be initialized, or the configuration is
    /// invalid. Once loading has begun, failures are reported through the
    /// returned [`LoadReport`] (`records_failed`, `aborted`) instead, so
    /// the counts survive partial failure.
    pub async fn run_load(config: Config) -> Result<LoadReport> {
        run_load_with_shutdown(config, CancellationToken::new()).await
    }

    /// Like [`run_load`], with caller-controlled cancellation.
    ///
    /// Cancellation is honored between rows: the current window is flushed,
    /// then the run stops and reports the partial counts.
    pub async fn run_load_with_shutdown(
        config: Config,
        shutdown: CancellationToken,
    ) -> Result<LoadReport> {
        let delimiter = ascii_byte(config.delimiter, "delimiter")?;
        let quote = ascii_byte(config.quote_char, "quote character")?;
        if config.batch_size == 0 {
            bail!("batch size must be at least 1");
        }
        let schema = Schema::new(config.schema.clone(), &config.primary_key_field)
            .context("Invalid schema configuration")?;

        let total_rows = count_data_rows(&config.input).await?;
        info!(
            "Total data rows in {}: {}",
            config.input.display(),
            total_rows
        );

        let mut source = RecordSource::open(&config.input, delimiter, quote).await?;

        let pool = init_db_pool_with_path(&config.db_path).await?;
        let store = SqliteTableStore::open(Arc::clone(&pool), &config.table, &schema)
            .await
            .context("Failed to initialize target table")?;

        let stats = Arc::new(LoadStats::new());
        let writer = BatchWriter::new(
            store,
            BatchConfig {
                batch_size: config.batch_size,
                flush_timeout: Duration::from_secs(config.batch_timeout_seconds),
            },
            Arc::clone(&stats),
        );
        let loader = Loader::new(schema, writer, Arc::clone(&stats));

        info!(
            "Starting load into table {:?} (batch size {})",
            config.table, config.batch_size
        );
        let start_time = std::time::Instant::now();
        let tally = loader.run(&mut source, &shutdown).await;
        let elapsed_seconds = start_time.elapsed().as_secs_f64();

        stats.print_statistics();
        info!(
            "Load statistics: read={}, written={}, skipped={}, failed={}",
            tally.records_read, tally.records_written, tally.records_skipped, tally.records_failed
        );

        Ok(LoadReport {
            records_read: tally.records_read,
            records_written: tally.records_written,
            records_skipped: tally.records_skipped,
            records_failed: tally.records_failed,
            failed_keys: tally.failed_keys,
            shape_mismatches: tally.shape_mismatches,
            table: config.table.clone(),
            db_path: config.db_path.clone(),
            elapsed_seconds,
            aborted: tally.aborted,
        })
    }
}
