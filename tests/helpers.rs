// Shared test helpers for input fixtures and store inspection.
//
// This module provides common utilities used across multiple test files to
// reduce duplication.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;

use table_loader::Config;

/// Writes `lines` to `name` inside `dir` and returns the file's path.
#[allow(dead_code)] // Used by other test files
pub fn write_input(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).expect("Failed to create input file");
    for line in lines {
        writeln!(file, "{line}").expect("Failed to write input line");
    }
    file.flush().expect("Failed to flush input file");
    path
}

/// A well-formed 8-column report row with the given reportIdx.
#[allow(dead_code)] // Used by other test files
pub fn report_row(idx: &str) -> String {
    format!(r#""2024-01-01","AcmeCorp","ACM","Q1 Outlook","120.50","J. Doe","BigBank","{idx}""#)
}

/// Config pointing at a test input and database, with defaults elsewhere.
#[allow(dead_code)] // Used by other test files
pub fn test_config(input: &Path, db_path: &Path, table: &str) -> Config {
    Config {
        input: input.to_path_buf(),
        db_path: db_path.to_path_buf(),
        table: table.to_string(),
        ..Default::default()
    }
}

/// Counts the items currently in `table`.
#[allow(dead_code)] // Used by other test files
pub async fn count_rows(db_path: &Path, table: &str) -> i64 {
    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open test database");
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{table}\""))
        .fetch_one(&pool)
        .await
        .expect("Failed to count rows")
}

/// Fetches one field of the item with the given primary-key value.
#[allow(dead_code)] // Used by other test files
pub async fn fetch_field(
    db_path: &Path,
    table: &str,
    key_field: &str,
    key: &str,
    field: &str,
) -> String {
    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open test database");
    sqlx::query_scalar(&format!(
        "SELECT \"{field}\" FROM \"{table}\" WHERE \"{key_field}\" = ?"
    ))
    .bind(key)
    .fetch_one(&pool)
    .await
    .expect("Failed to fetch field")
}
