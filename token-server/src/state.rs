//! Application state
//!
//! 所有服务的共享引用。Dependencies are built once here and injected
//! explicitly — handlers never reach for process-wide globals.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::cache::{CacheAside, CacheStore, MemoryCache};
use crate::config::Config;
use crate::db::DbService;
use crate::error::AppError;
use crate::live::StatusHub;
use crate::orders::OrderService;
use crate::services::CatalogService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Cache backend handle (janitor sweeps through it)
    pub cache_store: Arc<dyn CacheStore>,
    /// Product catalog service
    pub catalog: CatalogService,
    /// Order lifecycle service
    pub orders: OrderService,
    /// Realtime status fan-out
    pub status_hub: StatusHub,
}

impl AppState {
    /// Production construction: open the database, run migrations, wire
    /// the in-process cache
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::build(db.pool, Arc::new(MemoryCache::new())))
    }

    /// Wire services around an existing pool and cache store (also the
    /// test entry point)
    pub fn build(pool: SqlitePool, cache_store: Arc<dyn CacheStore>) -> Self {
        let cache = CacheAside::new(cache_store.clone());
        let status_hub = StatusHub::new();
        let catalog = CatalogService::new(pool.clone(), cache.clone());
        let orders = OrderService::new(pool.clone(), cache.clone(), status_hub.clone());

        Self {
            pool,
            cache_store,
            catalog,
            orders,
            status_hub,
        }
    }
}
