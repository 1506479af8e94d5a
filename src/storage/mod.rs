// storage/mod.rs
// Store operations module

pub mod batch;
pub mod pool;
pub mod table;

// Re-export commonly used items
pub use batch::{BatchConfig, BatchWriter, FlushResult};
pub use pool::init_db_pool_with_path;
pub use table::{PutBatchOutcome, RejectedItem, SqliteTableStore, TableStore};
