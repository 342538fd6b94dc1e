//! In-Process Store Module
//!
//! A persistence port that keeps tables in process memory. Behaves like the
//! SQL adapter (missing tables and duplicate keys are errors) and can be told
//! to fail or slow down so callers can exercise their error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::store::Store;
use crate::table::Table;

type Rows = HashMap<String, Vec<u8>>;

// == Memory Store ==
/// Shared in-process store; clones see the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Mutex<HashMap<String, Rows>>,
    failing: AtomicBool,
    latency: Mutex<Option<Duration>>,
    fetches: AtomicU64,
    updates: AtomicU64,
    inserts: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with [`StoreError::Backend`].
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every subsequent operation by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.inner.latency.lock() = latency;
    }

    /// Writes a row directly, bypassing any cache. Creates the table if needed.
    pub fn seed(&self, table: &str, key: &str, data: &[u8]) {
        self.inner
            .tables
            .lock()
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
    }

    /// Reads a row directly.
    pub fn stored(&self, table: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .tables
            .lock()
            .get(table)
            .and_then(|rows| rows.get(key).cloned())
    }

    /// Number of rows in `table`, or `None` if it was never created.
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.inner.tables.lock().get(table).map(|rows| rows.len())
    }

    /// Number of fetch round-trips attempted.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// Number of update round-trips attempted.
    pub fn update_count(&self) -> u64 {
        self.inner.updates.load(Ordering::Relaxed)
    }

    /// Number of insert round-trips attempted.
    pub fn insert_count(&self) -> u64 {
        self.inner.inserts.load(Ordering::Relaxed)
    }

    /// Number of delete round-trips attempted.
    pub fn delete_count(&self) -> u64 {
        self.inner.deletes.load(Ordering::Relaxed)
    }

    // Latency and failure checks run before touching any table
    async fn round_trip(&self, counter: &AtomicU64) -> StoreResult<()> {
        counter.fetch_add(1, Ordering::Relaxed);

        let latency = *self.inner.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }

    fn with_rows<T>(
        &self,
        table: &Table,
        f: impl FnOnce(&mut Rows) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut tables = self.inner.tables.lock();
        let rows = tables
            .get_mut(table.name())
            .ok_or_else(|| StoreError::Backend(format!("no such table: {}", table.name())))?;
        f(rows)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&self, table: &Table) -> StoreResult<()> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        self.inner
            .tables
            .lock()
            .entry(table.name().to_string())
            .or_default();
        Ok(())
    }

    async fn fetch(&self, table: &Table, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.round_trip(&self.inner.fetches).await?;
        self.with_rows(table, |rows| Ok(rows.get(key).cloned()))
    }

    async fn update(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<u64> {
        self.round_trip(&self.inner.updates).await?;
        self.with_rows(table, |rows| match rows.get_mut(key) {
            Some(existing) => {
                *existing = data.to_vec();
                Ok(1)
            }
            None => Ok(0),
        })
    }

    async fn insert(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<()> {
        self.round_trip(&self.inner.inserts).await?;
        self.with_rows(table, |rows| {
            if rows.contains_key(key) {
                return Err(StoreError::Backend(format!(
                    "UNIQUE constraint failed: {}.key",
                    table.name()
                )));
            }
            rows.insert(key.to_string(), data.to_vec());
            Ok(())
        })
    }

    async fn delete(&self, table: &Table, key: &str) -> StoreResult<u64> {
        self.round_trip(&self.inner.deletes).await?;
        self.with_rows(table, |rows| Ok(u64::from(rows.remove(key).is_some())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Upsert;

    fn table() -> Table {
        Table::new("certs").unwrap()
    }

    #[tokio::test]
    async fn test_missing_table_errors() {
        let store = MemoryStore::new();
        let result = store.fetch(&table(), "a").await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = MemoryStore::new();
        store.seed("certs", "a", b"alpha");

        store.ensure_schema(&table()).await.unwrap();
        store.ensure_schema(&table()).await.unwrap();

        assert_eq!(store.row_count("certs"), Some(1));
    }

    #[tokio::test]
    async fn test_upsert_paths() {
        let store = MemoryStore::new();
        let table = table();
        store.ensure_schema(&table).await.unwrap();

        assert_eq!(store.upsert(&table, "a", b"one").await.unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(&table, "a", b"two").await.unwrap(), Upsert::Updated);

        assert_eq!(store.stored("certs", "a"), Some(b"two".to_vec()));
        assert_eq!(store.update_count(), 2);
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_errors() {
        let store = MemoryStore::new();
        let table = table();
        store.ensure_schema(&table).await.unwrap();

        store.insert(&table, "a", b"one").await.unwrap();
        assert!(store.insert(&table, "a", b"two").await.is_err());
        assert_eq!(store.stored("certs", "a"), Some(b"one".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_absent_row() {
        let store = MemoryStore::new();
        let table = table();
        store.ensure_schema(&table).await.unwrap();

        assert_eq!(store.delete(&table, "missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::new();
        let table = table();
        store.ensure_schema(&table).await.unwrap();
        store.set_failing(true);

        assert!(store.ensure_schema(&table).await.is_err());
        assert!(store.fetch(&table, "a").await.is_err());
        assert!(store.upsert(&table, "a", b"x").await.is_err());
        assert!(store.delete(&table, "a").await.is_err());

        store.set_failing(false);
        assert_eq!(store.row_count("certs"), Some(0));
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.seed("certs", "a", b"alpha");

        assert_eq!(store.stored("certs", "a"), Some(b"alpha".to_vec()));
    }
}
