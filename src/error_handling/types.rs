//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for schema configuration.
///
/// All variants are configuration errors: they abort the run before any
/// rows are read.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema has no fields.
    #[error("schema must declare at least one field")]
    Empty,

    /// A field name is not usable as a store column name.
    #[error("invalid field name {0:?}: names must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidFieldName(String),

    /// The same field name appears twice.
    #[error("duplicate field name {0:?}")]
    DuplicateField(String),

    /// The declared primary key is not one of the schema fields.
    #[error("primary key field {0:?} is not in the schema")]
    UnknownPrimaryKey(String),
}

/// Error types for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A table name is not usable as a store identifier.
    #[error("invalid table name {0:?}: names must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTableName(String),

    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Errors produced while loading.
///
/// `SourceUnavailable` and `StoreUnavailable` are fatal;
/// `RecordShapeMismatch` and `PartialBatchFailure` are reported and the
/// run continues.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input cannot be opened or read. Fatal; no further writes are
    /// issued.
    #[error("cannot read input {}: {source}", .path.display())]
    SourceUnavailable {
        /// Path of the input that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A row has fewer columns than the schema requires. The row is
    /// reported and skipped.
    #[error("row {row_index}: expected at least {expected} columns, found {actual}")]
    RecordShapeMismatch {
        /// 1-based line number of the offending row.
        row_index: usize,
        /// Schema length.
        expected: usize,
        /// Columns actually present.
        actual: usize,
    },

    /// The store rejected some items in a batch. The failed keys are
    /// surfaced in the run summary so a caller may retry them.
    #[error("store left {} record(s) unwritten in a batch", .failed_keys.len())]
    PartialBatchFailure {
        /// Primary-key values of the records that were not written.
        failed_keys: Vec<String>,
    },

    /// The store cannot be reached after a bounded number of attempts.
    /// Fatal.
    #[error("store unavailable after {attempts} attempt(s): {source}")]
    StoreUnavailable {
        /// Connection attempts made before giving up.
        attempts: usize,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Anomaly types counted during a load run.
///
/// These categorize recoverable conditions - rows or writes that did not
/// make it into the store but did not abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Row had fewer columns than the schema requires
    ShortRow,
    /// Store rejected an individual item in a batch
    StoreRejection,
    /// A batch write exceeded the configured timeout
    BatchTimeout,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the anomaly type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ShortRow => "Short row (fewer columns than schema)",
            ErrorType::StoreRejection => "Store rejected item",
            ErrorType::BatchTimeout => "Batch write timeout",
        }
    }
}
