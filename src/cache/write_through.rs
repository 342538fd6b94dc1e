//! Write-Through Cache Module
//!
//! Combines the in-memory map with a persistence port. The store is
//! authoritative; memory only ever holds payloads this process wrote.

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::entries::MemoryMap;
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::config::Config;
use crate::context::Context;
use crate::error::{CacheError, Result, StoreError};
use crate::store::Store;
use crate::table::Table;

// == Cache ==
/// Write-through cache over a [`Store`].
///
/// Gets share a read lock; puts and deletes hold the write lock across both
/// the store round-trip and the memory update, so no caller observes one
/// layer ahead of the other.
#[derive(Debug)]
pub struct Cache<S: Store> {
    store: S,
    table: Table,
    memory: RwLock<MemoryMap>,
    stats: StatsRecorder,
}

impl<S: Store> Cache<S> {
    // == Constructor ==
    /// Validates `table_name`, creates the table if absent and returns a
    /// ready cache.
    ///
    /// # Errors
    /// * [`CacheError::Config`] if `table_name` is blank
    /// * [`CacheError::Store`] if the schema bootstrap fails
    pub async fn new(store: S, table_name: &str) -> Result<Self> {
        let table = Table::new(table_name)?;

        if let Err(err) = store.ensure_schema(&table).await {
            warn!("Schema bootstrap failed for table {}: {}", table.name(), err);
            return Err(err.into());
        }
        info!("Cache ready on table {}", table.name());

        Ok(Self {
            store,
            table,
            memory: RwLock::new(MemoryMap::new()),
            stats: StatsRecorder::default(),
        })
    }

    /// Creates a cache on the table named by `config`.
    pub async fn from_config(store: S, config: &Config) -> Result<Self> {
        Self::new(store, &config.table_name).await
    }

    // == Get ==
    /// Returns the payload for `key`.
    ///
    /// Served from memory when present, otherwise fetched from the store. A
    /// store hit is not copied into memory.
    ///
    /// # Errors
    /// * [`CacheError::CacheMiss`] if neither layer has the key
    /// * [`CacheError::Store`] on store failure or cancellation
    pub async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>> {
        let memory = ctx.run(async { Ok(self.memory.read().await) }).await?;

        if let Some(data) = memory.get(key) {
            self.stats.record_memory_hit();
            debug!(key, "Served from memory");
            return Ok(data.to_vec());
        }

        // Keep the read lock so no put/delete lands between miss and fetch
        let fetched = ctx.run(self.store.fetch(&self.table, key)).await;
        drop(memory);

        match fetched.map_err(|err| self.store_failure("fetch", key, err))? {
            Some(data) => {
                self.stats.record_store_hit();
                debug!(key, "Served from store");
                Ok(data)
            }
            None => {
                self.stats.record_miss();
                debug!(key, "Cache miss");
                Err(CacheError::CacheMiss)
            }
        }
    }

    // == Put ==
    /// Writes `data` under `key` to the store, then to memory.
    ///
    /// A store error leaves memory untouched. A cancelled upsert may or may
    /// not have reached the store, so the key is dropped from memory instead.
    pub async fn put(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        let mut memory = ctx.run(async { Ok(self.memory.write().await) }).await?;

        match ctx.run(self.store.upsert(&self.table, key, data)).await {
            Ok(outcome) => {
                memory.insert(key, data);
                self.stats.record_write();
                debug!(key, ?outcome, bytes = data.len(), "Stored");
                Ok(())
            }
            Err(err) => {
                if err.is_cancellation() {
                    memory.remove(key);
                }
                Err(self.store_failure("upsert", key, err))
            }
        }
    }

    // == Delete ==
    /// Removes `key` from memory and the store. Deleting an absent key
    /// succeeds.
    pub async fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        let mut memory = ctx.run(async { Ok(self.memory.write().await) }).await?;

        memory.remove(key);

        let rows = ctx
            .run(self.store.delete(&self.table, key))
            .await
            .map_err(|err| self.store_failure("delete", key, err))?;
        self.stats.record_delete();
        debug!(key, rows, "Deleted");
        Ok(())
    }

    // == Introspection ==
    /// Returns the table this cache writes to.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of entries held in memory.
    pub async fn len(&self) -> usize {
        self.memory.read().await.len()
    }

    /// Returns true if memory holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.memory.read().await.is_empty()
    }

    /// Returns true if `key` is held in memory. Never touches the store.
    pub async fn contains_cached(&self, key: &str) -> bool {
        self.memory.read().await.contains(key)
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.len().await;
        self.stats.snapshot(entries)
    }

    fn store_failure(&self, op: &str, key: &str, err: StoreError) -> CacheError {
        if err.is_cancellation() {
            debug!(key, "Store {} abandoned: {}", op, err);
        } else {
            warn!(key, table = self.table.name(), "Store {} failed: {}", op, err);
        }
        CacheError::Store(err)
    }
}
