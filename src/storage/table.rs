//! Key-value table store.
//!
//! [`TableStore`] is the seam between the loader and whatever holds the
//! data: a table addressable by name, supporting item upsert by primary key
//! and batched writes with a provider-defined maximum batch size. The
//! loader treats it as an opaque capability exposing
//! `put_batch(items) -> {accepted, rejected}`.
//!
//! [`SqliteTableStore`] is the provided implementation. It is constructed
//! once per run with a frozen table name and schema; the DDL and upsert SQL
//! are precomputed at construction so the write path has no per-item string
//! building.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error_handling::{LoadError, StoreError};
use crate::schema::{is_valid_identifier, Record, Schema};

/// Result of one batched write.
#[derive(Debug, Default)]
pub struct PutBatchOutcome {
    /// Primary-key values of items the store accepted.
    pub accepted: Vec<String>,
    /// Items the store rejected, with the rejection reason.
    pub rejected: Vec<RejectedItem>,
}

/// One item the store refused to write.
#[derive(Debug)]
pub struct RejectedItem {
    /// Primary-key value of the rejected item.
    pub key: String,
    /// Store-reported reason.
    pub reason: String,
}

/// A key-value table that accepts batched upserts.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// The table this store writes into.
    fn name(&self) -> &str;

    /// Provider-defined maximum number of items per batch. Larger windows
    /// are split by the batch writer before reaching the store.
    fn max_batch_items(&self) -> usize;

    /// Writes `items`, upserting by primary key.
    ///
    /// Item-level rejections are reported in the outcome; the run
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::StoreUnavailable`] only when the store itself
    /// is unreachable, which aborts the run.
    async fn put_batch(&self, items: &[Record]) -> Result<PutBatchOutcome, LoadError>;
}

/// SQLite-backed [`TableStore`].
///
/// The target table is created on first use: one TEXT column per schema
/// field, primary key on the configured field. Upserts use
/// `ON CONFLICT ... DO UPDATE` so re-loading an input replaces rows
/// instead of duplicating them.
pub struct SqliteTableStore {
    pool: Arc<SqlitePool>,
    table: String,
    upsert_sql: String,
}

impl SqliteTableStore {
    /// Per-batch item cap for this store.
    ///
    /// SQLite has no batch-write API of its own; this cap bounds how long a
    /// single flush can hold the write path per chunk.
    pub const MAX_BATCH_ITEMS: usize = 100;

    /// Creates the store, validating identifiers and creating the target
    /// table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTableName`] for an unusable table name,
    /// or [`StoreError::SqlError`] if the DDL fails. Schema field names are
    /// validated by [`Schema::new`] before this point.
    pub async fn open(
        pool: Arc<SqlitePool>,
        table: &str,
        schema: &Schema,
    ) -> Result<Self, StoreError> {
        if !is_valid_identifier(table) {
            return Err(StoreError::InvalidTableName(table.to_string()));
        }

        sqlx::query(&build_create_table_sql(table, schema))
            .execute(pool.as_ref())
            .await?;

        Ok(SqliteTableStore {
            pool,
            table: table.to_string(),
            upsert_sql: build_upsert_sql(table, schema),
        })
    }
}

#[async_trait]
impl TableStore for SqliteTableStore {
    fn name(&self) -> &str {
        &self.table
    }

    fn max_batch_items(&self) -> usize {
        Self::MAX_BATCH_ITEMS
    }

    async fn put_batch(&self, items: &[Record]) -> Result<PutBatchOutcome, LoadError> {
        let mut outcome = PutBatchOutcome::default();
        for item in items {
            let mut query = sqlx::query(&self.upsert_sql);
            for value in &item.values {
                query = query.bind(value.as_str());
            }
            match query.execute(self.pool.as_ref()).await {
                Ok(_) => outcome.accepted.push(item.key.clone()),
                Err(e) if is_connection_error(&e) => {
                    return Err(LoadError::StoreUnavailable {
                        attempts: 1,
                        source: StoreError::SqlError(e),
                    });
                }
                Err(e) => {
                    log::warn!("Store rejected item {:?}: {e}", item.key);
                    outcome.rejected.push(RejectedItem {
                        key: item.key.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }
}

/// True for errors that mean the store itself is gone, as opposed to the
/// store refusing one item.
fn is_connection_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::PoolClosed
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
    )
}

/// `CREATE TABLE IF NOT EXISTS` for the target table.
///
/// Identifiers are interpolated, never bound, so both the table name and
/// the schema fields have been validated as identifiers before this runs.
fn build_create_table_sql(table: &str, schema: &Schema) -> String {
    let columns: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| format!("\"{f}\" TEXT NOT NULL"))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" ({}, PRIMARY KEY (\"{}\"))",
        columns.join(", "),
        schema.primary_key()
    )
}

/// Upsert statement with one placeholder per schema field.
fn build_upsert_sql(table: &str, schema: &Schema) -> String {
    let columns: Vec<String> = schema.fields().iter().map(|f| format!("\"{f}\"")).collect();
    let placeholders: Vec<&str> = schema.fields().iter().map(|_| "?").collect();
    let updates: Vec<String> = schema
        .fields()
        .iter()
        .filter(|f| f.as_str() != schema.primary_key())
        .map(|f| format!("\"{f}\"=excluded.\"{f}\""))
        .collect();
    // A schema consisting of only the key has nothing to update on conflict
    let conflict_action = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };
    format!(
        "INSERT INTO \"{table}\" ({}) VALUES ({}) ON CONFLICT(\"{}\") {}",
        columns.join(", "),
        placeholders.join(", "),
        schema.primary_key(),
        conflict_action
    )
}
