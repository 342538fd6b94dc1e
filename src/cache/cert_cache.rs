//! Pluggable Cache Interface
//!
//! The three-operation shape a certificate manager expects from its cache.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::Cache;
use crate::context::Context;
use crate::error::Result;
use crate::store::Store;

/// Key to certificate-bytes storage used by an automatic certificate manager.
///
/// `get` must report an absent key as [`CacheError::CacheMiss`](crate::error::CacheError::CacheMiss)
/// so callers can tell "not present" from "storage broken".
#[async_trait]
pub trait CertCache: Send + Sync {
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>>;

    async fn put(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()>;

    async fn delete(&self, ctx: &Context, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: Store> CertCache for Cache<S> {
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>> {
        Cache::get(self, ctx, key).await
    }

    async fn put(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        Cache::put(self, ctx, key, data).await
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        Cache::delete(self, ctx, key).await
    }
}

#[async_trait]
impl<T: CertCache + ?Sized> CertCache for Arc<T> {
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>> {
        (**self).get(ctx, key).await
    }

    async fn put(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        (**self).put(ctx, key, data).await
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        (**self).delete(ctx, key).await
    }
}
