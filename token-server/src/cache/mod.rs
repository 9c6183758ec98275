//! Cache Module
//!
//! Key/value store with expiry behind the [`CacheStore`] trait, the
//! cache-aside protocol on top of it, and the key/TTL table used by the
//! catalog and order read paths.
//!
//! The cache only ever holds derived copies of query results: losing
//! every entry loses performance, never information.

pub mod aside;
pub mod keys;
pub mod memory;

pub use aside::CacheAside;
pub use memory::MemoryCache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value store with per-entry expiry
///
/// All operations are idempotent; deleting an absent key is not an
/// error. Callers are expected to treat failures as misses (fail-soft) —
/// the cache-aside layer does exactly that.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Drop expired entries; returns how many were evicted. Backends with
    /// native expiry keep the default no-op.
    async fn purge_expired(&self) -> CacheResult<usize> {
        Ok(0)
    }
}
