//! The Loader: sequential row consumption and tallying.
//!
//! Consumes the Record Source in order, maps each row through the schema,
//! and feeds well-formed records to the batch writer. One record at a time,
//! one batch in flight at a time; cancellation is honored between rows and
//! the window is always flushed before returning, on every exit path.

use std::sync::Arc;

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::PROGRESS_LOG_EVERY_ROWS;
use crate::error_handling::{ErrorType, LoadError, LoadStats};
use crate::schema::{Schema, ShapeMismatch};
use crate::source::RecordSource;
use crate::storage::batch::{BatchWriter, FlushResult};
use crate::storage::table::TableStore;

/// Counters and per-row findings accumulated over one run.
///
/// Counter semantics: `records_read` counts rows successfully mapped to
/// records, so `records_written + records_failed == records_read` holds
/// unconditionally; blank lines and short rows land in `records_skipped`.
#[derive(Debug, Default)]
pub struct LoadTally {
    /// Rows mapped to records and handed to the writer.
    pub records_read: usize,
    /// Records the store accepted.
    pub records_written: usize,
    /// Blank lines plus rows that failed to map.
    pub records_skipped: usize,
    /// Records the store did not accept.
    pub records_failed: usize,
    /// Primary-key values of the failed records.
    pub failed_keys: Vec<String>,
    /// Rows dropped for having fewer columns than the schema.
    pub shape_mismatches: Vec<ShapeMismatch>,
    /// Set when a fatal error stopped the run early.
    pub aborted: Option<String>,
}

/// Sequential loader over a [`RecordSource`].
pub struct Loader<S: TableStore> {
    schema: Schema,
    writer: BatchWriter<S>,
    stats: Arc<LoadStats>,
}

impl<S: TableStore> Loader<S> {
    /// Creates a loader over `writer` with the given column mapping.
    pub fn new(schema: Schema, writer: BatchWriter<S>, stats: Arc<LoadStats>) -> Self {
        Loader {
            schema,
            writer,
            stats,
        }
    }

    /// Consumes `source` to exhaustion (or cancellation, or fatal error)
    /// and returns the tally.
    ///
    /// Rather than propagating mid-run errors, the tally's `aborted` field
    /// carries the fatal cause so counts are available to the caller even
    /// on failure.
    pub async fn run(mut self, source: &mut RecordSource, shutdown: &CancellationToken) -> LoadTally {
        let mut tally = LoadTally::default();

        loop {
            if shutdown.is_cancelled() {
                info!("Cancellation requested; flushing pending records");
                break;
            }

            let row = match source.next_row().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => {
                    log::error!("Input failed mid-run: {e}");
                    tally.aborted = Some(e.to_string());
                    break;
                }
            };

            if row.fields.is_empty() {
                tally.records_skipped += 1;
                continue;
            }

            let record = match self.schema.project(row.index, &row.fields) {
                Ok(record) => record,
                Err(mismatch) => {
                    warn!("{}", LoadError::from(mismatch.clone()));
                    self.stats.increment(ErrorType::ShortRow);
                    tally.records_skipped += 1;
                    tally.shape_mismatches.push(mismatch);
                    continue;
                }
            };

            tally.records_read += 1;
            if let Some(result) = self.writer.add_record(record).await {
                absorb(&mut tally, result);
                if tally.aborted.is_some() {
                    return tally;
                }
            }

            if tally.records_read % PROGRESS_LOG_EVERY_ROWS == 0 {
                info!(
                    "Progress: {} read, {} written, {} skipped, {} failed",
                    tally.records_read,
                    tally.records_written,
                    tally.records_skipped,
                    tally.records_failed
                );
            }
        }

        // Final flush: the window must be empty before the run ends
        let result = self.writer.flush().await;
        absorb(&mut tally, result);
        tally
    }
}

/// Folds one flush into the running tally.
fn absorb(tally: &mut LoadTally, result: FlushResult) {
    if let Some(err) = result.as_partial_failure() {
        warn!("{err}");
    }
    tally.records_written += result.written;
    tally.records_failed += result.failed;
    tally.failed_keys.extend(result.failed_keys);
    if let Some(cause) = result.aborted {
        tally.aborted = Some(cause);
    }
}
