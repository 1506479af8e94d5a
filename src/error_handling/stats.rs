//! Load anomaly statistics tracking.
//!
//! Thread-safe counters for the recoverable anomalies a run can hit.
//! Sequential loading only ever touches these from one task, but the
//! counters are shared between the loader and the batch writer, so they
//! use atomics behind an `Arc` rather than `&mut` plumbing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Per-anomaly counters for a load run.
///
/// All types are initialized to zero on creation.
pub struct LoadStats {
    counters: HashMap<ErrorType, AtomicUsize>,
}

impl LoadStats {
    /// Creates a tracker with every anomaly type initialized to zero.
    pub fn new() -> Self {
        let mut counters = HashMap::new();
        for error_type in ErrorType::iter() {
            counters.insert(error_type, AtomicUsize::new(0));
        }
        LoadStats { counters }
    }

    /// Increment an anomaly counter.
    pub fn increment(&self, error_type: ErrorType) {
        if let Some(counter) = self.counters.get(&error_type) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            // All variants are inserted in new(); reaching this arm means a
            // variant was added without re-running the constructor.
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map",
                error_type
            );
        }
    }

    /// Get the count for an anomaly type.
    pub fn get(&self, error_type: ErrorType) -> usize {
        self.counters
            .get(&error_type)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total anomaly count across all types.
    pub fn total(&self) -> usize {
        ErrorType::iter().map(|e| self.get(e)).sum()
    }

    /// Logs a per-type breakdown of the anomalies recorded during the run.
    pub fn print_statistics(&self) {
        if self.total() == 0 {
            log::debug!("No load anomalies recorded");
            return;
        }
        log::info!("Load anomalies:");
        for error_type in ErrorType::iter() {
            let count = self.get(error_type);
            if count > 0 {
                log::info!("  {}: {}", error_type, count);
            }
        }
    }
}

impl Default for LoadStats {
    fn default() -> Self {
        Self::new()
    }
}
