//! Store Module
//!
//! The persistence port the cache writes through to, plus its adapters.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::table::Table;

pub use memory::MemoryStore;
pub use sqlite::SqlStore;

// == Upsert Outcome ==
/// Which half of the two-step upsert wrote the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An existing row was overwritten
    Updated,
    /// No row matched, so a new one was inserted
    Inserted,
}

// == Store Port ==
/// Durable key/blob storage behind the cache.
///
/// Implementations manage their own connection pooling and must be safe to
/// call from any task. Cancellation is applied by the caller around each
/// call, so implementations only need to be cancel-safe when dropped.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Creates the two-column table if it does not exist yet.
    async fn ensure_schema(&self, table: &Table) -> StoreResult<()>;

    /// Returns the payload stored under `key`, or `None` if no row matches.
    async fn fetch(&self, table: &Table, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Overwrites the payload of an existing row and returns rows affected.
    async fn update(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<u64>;

    /// Inserts a new row.
    async fn insert(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Removes the row for `key` and returns rows affected (zero is fine).
    async fn delete(&self, table: &Table, key: &str) -> StoreResult<u64>;

    /// Update, then insert if the update touched no row.
    ///
    /// Avoids backend-specific `ON CONFLICT` syntax at the cost of a second
    /// round trip on first write.
    async fn upsert(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<Upsert> {
        if self.update(table, key, data).await? > 0 {
            return Ok(Upsert::Updated);
        }
        self.insert(table, key, data).await?;
        Ok(Upsert::Inserted)
    }
}
