//! Batched writes.
//!
//! The BatchWindow: an ordered, bounded buffer of pending records owned by
//! the [`BatchWriter`], flushed when it reaches the configured size and
//! once more when the input is exhausted. Flushes are split to the store's
//! own per-batch limit and bounded by a per-batch timeout.

mod writer;

pub use writer::BatchWriter;

use std::time::Duration;

use crate::error_handling::LoadError;

/// Batch writer configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Records buffered before an automatic flush.
    pub batch_size: usize,
    /// Upper bound on one `put_batch` call; a chunk that exceeds it is
    /// reported failed, not retried.
    pub flush_timeout: Duration,
}

/// Summary of one flush.
///
/// `written + failed == total` on every return; a fatal store failure
/// marks the unresolved remainder of the window failed and sets `aborted`
/// so no buffered record is silently lost.
#[derive(Debug, Default)]
pub struct FlushResult {
    /// Records taken from the window for this flush.
    pub total: usize,
    /// Records the store accepted.
    pub written: usize,
    /// Records rejected, timed out, or unresolved when the store vanished.
    pub failed: usize,
    /// Primary-key values of the failed records.
    pub failed_keys: Vec<String>,
    /// Set when the store became unreachable mid-flush; the run must stop.
    pub aborted: Option<String>,
}

impl FlushResult {
    /// The flush's failures as a reportable [`LoadError`], if any.
    pub fn as_partial_failure(&self) -> Option<LoadError> {
        if self.failed > 0 && self.aborted.is_none() {
            Some(LoadError::PartialBatchFailure {
                failed_keys: self.failed_keys.clone(),
            })
        } else {
            None
        }
    }
}
