//! Error types for the certificate cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type returned by the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid construction input
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Key present neither in memory nor in the store
    #[error("Cache miss")]
    CacheMiss,

    /// Underlying persistence operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CacheError {
    /// Returns true if this is the not-found sentinel rather than a failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss)
    }

    /// Returns true if the operation was abandoned because its context fired.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CacheError::Store(err) if err.is_cancellation())
    }
}

// == Store Error Enum ==
/// Errors surfaced by a persistence port.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQL driver error (connectivity, constraint violation, decoding)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure reported by a non-SQL backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// The caller's deadline elapsed before the operation finished
    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl StoreError {
    /// Returns true for the cancellation class (explicit cancel or deadline).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StoreError::Cancelled | StoreError::DeadlineExceeded)
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type for persistence port operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
