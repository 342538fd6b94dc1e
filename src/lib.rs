//! SQL Cert Cache - A write-through certificate cache backed by a SQL table
//!
//! Keeps payloads written by this process in memory and persists every write
//! to a two-column table before it becomes visible in memory.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod store;
pub mod table;

pub use cache::{Cache, CacheStats, CertCache};
pub use config::Config;
pub use context::{CancelHandle, Context};
pub use error::{CacheError, Result, StoreError};
pub use store::{MemoryStore, SqlStore, Store, Upsert};
pub use table::Table;
