//! Batch writer implementation.
//!
//! Collects records into the window and flushes them to the store in
//! store-sized chunks under a per-batch timeout.

use std::sync::Arc;

use crate::error_handling::{ErrorType, LoadStats};
use crate::schema::Record;
use crate::storage::table::TableStore;

use super::{BatchConfig, FlushResult};

/// Batch writer that collects records and writes them in batches.
///
/// Owns the window exclusively; callers must invoke [`BatchWriter::flush`]
/// once after the last record so nothing stays buffered.
pub struct BatchWriter<S: TableStore> {
    store: S,
    config: BatchConfig,
    buffer: Vec<Record>,
    stats: Arc<LoadStats>,
}

impl<S: TableStore> BatchWriter<S> {
    /// Creates a writer over `store` with an empty window.
    pub fn new(store: S, config: BatchConfig, stats: Arc<LoadStats>) -> Self {
        BatchWriter {
            store,
            config,
            buffer: Vec::new(),
            stats,
        }
    }

    /// Adds a record to the window, flushing if the window is full.
    ///
    /// Returns the [`FlushResult`] when a flush happened, `None` otherwise.
    pub async fn add_record(&mut self, record: Record) -> Option<FlushResult> {
        self.buffer.push(record);
        if self.buffer.len() >= self.config.batch_size {
            Some(self.flush().await)
        } else {
            None
        }
    }

    /// Flushes all buffered records to the store.
    ///
    /// The window is split into chunks no larger than the store's
    /// `max_batch_items()`. Each chunk runs under the configured timeout: a
    /// timed-out chunk is reported failed and the flush continues with the
    /// next chunk. If the store becomes unreachable, every unresolved
    /// record in the window is reported failed and `aborted` is set.
    pub async fn flush(&mut self) -> FlushResult {
        if self.buffer.is_empty() {
            return FlushResult::default();
        }

        let records: Vec<Record> = self.buffer.drain(..).collect();
        let mut result = FlushResult {
            total: records.len(),
            ..FlushResult::default()
        };
        log::debug!(
            "Flushing batch of {} record(s) to table {:?}",
            records.len(),
            self.store.name()
        );

        let chunk_size = self.store.max_batch_items().max(1);
        let chunks: Vec<&[Record]> = records.chunks(chunk_size).collect();
        for (i, chunk) in chunks.iter().enumerate() {
            match tokio::time::timeout(self.config.flush_timeout, self.store.put_batch(chunk))
                .await
            {
                Ok(Ok(outcome)) => {
                    result.written += outcome.accepted.len();
                    for rejected in outcome.rejected {
                        self.stats.increment(ErrorType::StoreRejection);
                        result.failed += 1;
                        result.failed_keys.push(rejected.key);
                    }
                }
                Ok(Err(e)) => {
                    // Store gone: fail this chunk and everything after it,
                    // then hand the abort up to the loader.
                    log::error!("Store write failed: {e}");
                    for record in chunks[i..].iter().flat_map(|c| c.iter()) {
                        result.failed += 1;
                        result.failed_keys.push(record.key.clone());
                    }
                    result.aborted = Some(e.to_string());
                    break;
                }
                Err(_elapsed) => {
                    self.stats.increment(ErrorType::BatchTimeout);
                    log::warn!(
                        "Batch write timed out after {:?}; {} record(s) reported failed",
                        self.config.flush_timeout,
                        chunk.len()
                    );
                    for record in chunk.iter() {
                        result.failed += 1;
                        result.failed_keys.push(record.key.clone());
                    }
                }
            }
        }

        if result.failed > 0 && result.aborted.is_none() {
            log::warn!(
                "Flush completed: {} written, {} failed out of {} total",
                result.written,
                result.failed,
                result.total
            );
        } else if result.aborted.is_none() {
            log::debug!("Successfully flushed {} record(s)", result.written);
        }

        result
    }
}
