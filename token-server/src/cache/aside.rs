//! Cache-aside protocol
//!
//! Read-through with explicit invalidation. The wrapper is deliberately
//! fail-soft: a broken cache store degrades every read to its database
//! loader instead of failing the request — the durable store remains the
//! source of truth, the cache is only a fast path.

use super::{CacheStore, keys};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::DataSource;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Read-through / write-invalidate wrapper around a [`CacheStore`]
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Serve `key` from the cache, or run `load` against the database,
    /// repopulate, and report [`DataSource::Database`].
    ///
    /// Cache failures (backend errors, undecodable entries) are logged
    /// and treated as misses; only the loader's own error can fail the
    /// call.
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        load: F,
    ) -> Result<(T, DataSource), E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => return Ok((value, DataSource::Cache)),
                Err(e) => {
                    // 缓存内容损坏：删掉重建
                    warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                    let _ = self.store.delete(key).await;
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to database");
            }
        }

        let value = load().await?;

        match serde_json::to_string(&value) {
            Ok(serialized) => {
                if let Err(e) = self.store.set_with_ttl(key, serialized, ttl).await {
                    warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Cache serialization failed"),
        }

        Ok((value, DataSource::Database))
    }

    /// Delete each key unconditionally. Idempotent and best-effort —
    /// failures are logged, the TTL is the backstop.
    pub async fn invalidate(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.store.delete(key).await {
                warn!(key = %key, error = %e, "Cache invalidation failed");
            }
        }
    }

    /// Both catalog keys — every product mutation clears them
    pub async fn invalidate_catalogs(&self) {
        self.invalidate(&[keys::CATALOG_PUBLIC, keys::CATALOG_ADMIN])
            .await;
    }

    /// The owning user's order history plus the admin list
    pub async fn invalidate_orders(&self, user_id: i64) {
        let user_key = keys::user_orders(user_id);
        self.invalidate(&[user_key.as_str(), keys::ORDERS_ADMIN])
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, MemoryCache};
    use async_trait::async_trait;

    /// Store whose every operation fails — exercises the fail-soft path
    struct BrokenCache;

    #[async_trait]
    impl CacheStore for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Backend("connection refused".into()))
        }
        async fn set_with_ttl(
            &self,
            _key: &str,
            _value: String,
            _ttl: Duration,
        ) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".into()))
        }
        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".into()))
        }
    }

    fn aside() -> CacheAside {
        CacheAside::new(Arc::new(MemoryCache::new()))
    }

    #[tokio::test]
    async fn first_read_loads_second_read_hits() {
        let cache = aside();
        let ttl = Duration::from_secs(60);

        let (value, source) = cache
            .get_or_load("k", ttl, || async { Ok::<_, ()>(vec![1, 2, 3]) })
            .await
            .unwrap();
        assert_eq!(value, vec![1, 2, 3]);
        assert_eq!(source, DataSource::Database);

        // a hit returns the cached copy, not the loader's fresh value
        let (value, source) = cache
            .get_or_load("k", ttl, || async { Ok::<_, ()>(vec![9, 9]) })
            .await
            .unwrap();
        assert_eq!(value, vec![1, 2, 3]);
        assert_eq!(source, DataSource::Cache);
    }

    #[tokio::test]
    async fn invalidation_forces_reload() {
        let cache = aside();
        let ttl = Duration::from_secs(60);

        let _ = cache
            .get_or_load("k", ttl, || async { Ok::<_, ()>(1) })
            .await;
        cache.invalidate(&["k"]).await;

        let (value, source) = cache
            .get_or_load("k", ttl, || async { Ok::<_, ()>(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
        assert_eq!(source, DataSource::Database);
    }

    #[tokio::test]
    async fn loader_error_propagates() {
        let cache = aside();
        let result: Result<(i32, DataSource), &str> = cache
            .get_or_load("k", Duration::from_secs(60), || async { Err("boom") })
            .await;
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[tokio::test]
    async fn broken_store_degrades_to_database_reads() {
        let cache = CacheAside::new(Arc::new(BrokenCache));
        let ttl = Duration::from_secs(60);

        for _ in 0..2 {
            let (value, source) = cache
                .get_or_load("k", ttl, || async { Ok::<_, ()>(42) })
                .await
                .unwrap();
            assert_eq!(value, 42);
            assert_eq!(source, DataSource::Database);
        }

        // invalidation against a broken store must not panic or fail
        cache.invalidate(&["k"]).await;
    }

    #[tokio::test]
    async fn undecodable_entry_is_dropped_and_reloaded() {
        let store = Arc::new(MemoryCache::new());
        store
            .set_with_ttl("k", "not json at all {".into(), Duration::from_secs(60))
            .await
            .unwrap();

        let cache = CacheAside::new(store);
        let (value, source) = cache
            .get_or_load("k", Duration::from_secs(60), || async { Ok::<_, ()>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(source, DataSource::Database);
    }
}
