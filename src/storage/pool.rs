//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled
//! - Automatic database file creation
//! - A bounded number of connection attempts; if the store cannot be
//!   reached after the last attempt the run fails with `StoreUnavailable`
//!   rather than retrying forever

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use sqlx::{Pool, Sqlite, SqlitePool};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::config::{
    RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_SECS, STORE_CONNECT_ATTEMPTS,
};
use crate::error_handling::{LoadError, StoreError};

/// Backoff schedule for store connection attempts.
///
/// Bounded by `STORE_CONNECT_ATTEMPTS`; the first attempt is immediate and
/// each retry waits longer, capped at `RETRY_MAX_DELAY_SECS`.
fn connect_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(STORE_CONNECT_ATTEMPTS - 1)
}

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode.
///
/// # Errors
///
/// Returns [`LoadError::StoreUnavailable`] if the file cannot be created or
/// the store cannot be reached after the bounded connection attempts.
pub async fn init_db_pool_with_path(
    db_path: &std::path::Path,
) -> Result<Arc<Pool<Sqlite>>, LoadError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(LoadError::StoreUnavailable {
                attempts: 1,
                source: StoreError::FileCreationError(e.to_string()),
            });
        }
    }

    let url = format!("sqlite:{}", db_path_str);
    let pool = Retry::spawn(connect_retry_strategy(), || {
        let url = url.clone();
        async move {
            SqlitePool::connect(&url).await.map_err(|e| {
                warn!("Store connection attempt failed: {e}");
                e
            })
        }
    })
    .await
    .map_err(|e| {
        error!(
            "Failed to connect to store after {} attempt(s): {e}",
            STORE_CONNECT_ATTEMPTS
        );
        LoadError::StoreUnavailable {
            attempts: STORE_CONNECT_ATTEMPTS,
            source: StoreError::SqlError(e),
        }
    })?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            LoadError::StoreUnavailable {
                attempts: 1,
                source: StoreError::SqlError(e),
            }
        })?;

    Ok(Arc::new(pool))
}
