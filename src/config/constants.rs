//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including parsing defaults, batching limits, and retry
//! parameters.

/// Default field delimiter for the input file.
pub const DEFAULT_DELIMITER: char = ',';
/// Default quote character for the input file.
pub const DEFAULT_QUOTE: char = '"';

/// Default maximum number of records buffered before a flush.
///
/// Matches the per-batch item cap that managed key-value table services
/// commonly enforce on their batch-write APIs, so the default behaves the
/// same against a remote store as against the embedded one.
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Default per-batch write timeout in seconds.
///
/// A flush that exceeds this is reported as failed rather than retried;
/// the run then continues with the next batch.
pub const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 30;

/// Default database path (SQLite file).
pub const DEFAULT_DB_PATH: &str = "./table_loader.db";

/// Default schema field used for upsert deduplication.
pub const DEFAULT_PRIMARY_KEY_FIELD: &str = "reportIdx";

/// Default schema: field names in input column order.
pub const DEFAULT_SCHEMA_FIELDS: [&str; 8] = [
    "date",
    "stockName",
    "stockId",
    "reportName",
    "priceGoal",
    "analyst",
    "firm",
    "reportIdx",
];

/// Returns the default schema as owned field names.
pub fn default_schema_fields() -> Vec<String> {
    DEFAULT_SCHEMA_FIELDS.iter().map(|f| f.to_string()).collect()
}

// Store connection retry strategy.
// Connection attempts are bounded; there is no unbounded retry loop.
/// Total store connection attempts before the run is declared failed
pub const STORE_CONNECT_ATTEMPTS: usize = 3;
/// Initial delay in milliseconds before the first connection retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which the retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between connection retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

/// Emit a progress log line every this many records read.
pub const PROGRESS_LOG_EVERY_ROWS: usize = 10_000;
