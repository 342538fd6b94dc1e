//! SQL Store Module
//!
//! sqlx-backed persistence port. Statements come precomputed from [`Table`].

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;
use crate::error::StoreResult;
use crate::store::Store;
use crate::table::Table;

// == SQL Store ==
/// Persistence port over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Wraps an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration.
    ///
    /// An in-memory database lives only as long as its connection, so such
    /// URLs get a single connection that is never recycled.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let pool_options =
            SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.acquire_timeout));
        let pool_options = if config.is_in_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(
            "SQL store connected: url={}, max_connections={}",
            config.database_url,
            pool.options().get_max_connections()
        );

        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqlStore {
    async fn ensure_schema(&self, table: &Table) -> StoreResult<()> {
        sqlx::query(table.create_statement())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch(&self, table: &Table, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let data = sqlx::query_scalar::<_, Vec<u8>>(table.fetch_statement())
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(data)
    }

    async fn update(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<u64> {
        let result = sqlx::query(table.update_statement())
            .bind(key)
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, table: &Table, key: &str, data: &[u8]) -> StoreResult<()> {
        sqlx::query(table.insert_statement())
            .bind(key)
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, table: &Table, key: &str) -> StoreResult<u64> {
        let result = sqlx::query(table.delete_statement())
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
