//! Error handling and load statistics.
//!
//! This module provides:
//! - The typed error taxonomy for a load run
//! - Anomaly counters tracked while loading (short rows, store rejections,
//!   batch timeouts)
//!
//! Propagation policy: malformed individual rows never abort a run;
//! connectivity and configuration errors do.

mod stats;
mod types;

// Re-export public API
pub use stats::LoadStats;
pub use types::{ErrorType, InitializationError, LoadError, SchemaError, StoreError};
