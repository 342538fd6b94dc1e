//! Cache Module
//!
//! Provides the write-through cache: an in-memory map in front of a
//! persistence port.

mod cert_cache;
mod entries;
mod stats;
mod write_through;


// Re-export public types
pub use cert_cache::CertCache;
pub use entries::MemoryMap;
pub use stats::CacheStats;
pub use write_through::Cache;
