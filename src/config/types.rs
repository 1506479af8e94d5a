//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    default_schema_fields, DEFAULT_BATCH_SIZE, DEFAULT_BATCH_TIMEOUT_SECS, DEFAULT_DB_PATH,
    DEFAULT_DELIMITER, DEFAULT_PRIMARY_KEY_FIELD, DEFAULT_QUOTE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages (and the final summary) are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options and library configuration.
///
/// This struct is automatically generated by `clap` from the field
/// attributes, and doubles as the library configuration: construct it
/// programmatically with `Config { .. }` and `Default` when not parsing a
/// command line.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// table_loader reports.csv --table reports
///
/// # Pipe-delimited input with a custom batch size
/// table_loader reports.psv --table reports --delimiter '|' --batch-size 100
///
/// # Custom schema and primary key
/// table_loader users.csv --table users --schema id,name,email --primary-key-field id
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "table_loader",
    about = "Bulk-loads a delimited text file into a key-value table."
)]
pub struct Config {
    /// File to read
    #[arg(value_parser)]
    pub input: PathBuf,

    /// Target table name
    #[arg(long)]
    pub table: String,

    /// Field delimiter (single ASCII character)
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Quote character (single ASCII character)
    ///
    /// Quoted fields may embed the delimiter; a doubled quote character
    /// inside a quoted field encodes a literal quote.
    #[arg(long, default_value_t = DEFAULT_QUOTE)]
    pub quote_char: char,

    /// Field names, in input column order
    ///
    /// Columns beyond the schema length are ignored; rows with fewer
    /// columns than the schema are reported and skipped.
    #[arg(long, value_delimiter = ',', default_values_t = default_schema_fields())]
    pub schema: Vec<String>,

    /// Schema field used for upsert deduplication
    ///
    /// Re-loading an input replaces items that share this field's value
    /// instead of duplicating them.
    #[arg(long, default_value = DEFAULT_PRIMARY_KEY_FIELD)]
    pub primary_key_field: String,

    /// Maximum records buffered before a flush
    ///
    /// Flushes are additionally split to the store's own per-batch limit.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Per-batch write timeout in seconds
    #[arg(long, default_value_t = DEFAULT_BATCH_TIMEOUT_SECS)]
    pub batch_timeout_seconds: u64,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("sample.csv"),
            table: "reports".to_string(),
            delimiter: DEFAULT_DELIMITER,
            quote_char: DEFAULT_QUOTE,
            schema: default_schema_fields(),
            primary_key_field: DEFAULT_PRIMARY_KEY_FIELD.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout_seconds: DEFAULT_BATCH_TIMEOUT_SECS,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_level_ordering() {
        // Error < Warn < Info < Debug < Trace
        let error = log::LevelFilter::from(LogLevel::Error);
        let warn = log::LevelFilter::from(LogLevel::Warn);
        let info = log::LevelFilter::from(LogLevel::Info);
        let debug = log::LevelFilter::from(LogLevel::Debug);
        let trace = log::LevelFilter::from(LogLevel::Trace);

        assert!(error < warn);
        assert!(warn < info);
        assert!(info < debug);
        assert!(debug < trace);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote_char, '"');
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.batch_timeout_seconds, 30);
        assert_eq!(config.primary_key_field, "reportIdx");
        assert_eq!(config.schema.len(), 8);
        assert_eq!(config.schema[0], "date");
        assert_eq!(config.schema[7], "reportIdx");
        assert_eq!(config.db_path, PathBuf::from("./table_loader.db"));
    }

    #[test]
    fn test_config_parses_cli_overrides() {
        let config = Config::parse_from([
            "table_loader",
            "input.psv",
            "--table",
            "users",
            "--delimiter",
            "|",
            "--schema",
            "id,name,email",
            "--primary-key-field",
            "id",
            "--batch-size",
            "100",
        ]);
        assert_eq!(config.input, PathBuf::from("input.psv"));
        assert_eq!(config.table, "users");
        assert_eq!(config.delimiter, '|');
        assert_eq!(config.schema, vec!["id", "name", "email"]);
        assert_eq!(config.primary_key_field, "id");
        assert_eq!(config.batch_size, 100);
    }
}
