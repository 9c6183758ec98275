//! Catalog Service — product management with cached listings
//!
//! Both catalog listings go through the cache-aside layer; every mutation
//! invalidates both keys before returning, so the next read observes the
//! change regardless of remaining TTL.

use crate::cache::{CacheAside, keys};
use crate::db::repository::{RepoError, product as product_repo};
use crate::error::{AppError, AppResult};
use shared::DataSource;
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

/// Product catalog service
#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    cache: CacheAside,
}

impl CatalogService {
    pub fn new(pool: SqlitePool, cache: CacheAside) -> Self {
        Self { pool, cache }
    }

    /// Public catalog — available products only
    pub async fn list_public(&self) -> AppResult<(Vec<Product>, DataSource)> {
        self.cache
            .get_or_load(keys::CATALOG_PUBLIC, keys::CATALOG_TTL, || async move {
                product_repo::find_available(&self.pool)
                    .await
                    .map_err(AppError::from)
            })
            .await
    }

    /// Admin catalog — unfiltered
    pub async fn list_all(&self) -> AppResult<(Vec<Product>, DataSource)> {
        self.cache
            .get_or_load(keys::CATALOG_ADMIN, keys::CATALOG_TTL, || async move {
                product_repo::find_all(&self.pool)
                    .await
                    .map_err(AppError::from)
            })
            .await
    }

    pub async fn create(&self, data: ProductCreate, created_by: i64) -> AppResult<Product> {
        let product = product_repo::create(&self.pool, data, created_by).await?;
        self.cache.invalidate_catalogs().await;
        tracing::info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, data: ProductUpdate) -> AppResult<Product> {
        let product = product_repo::update(&self.pool, id, data).await.map_err(
            |e| match e {
                RepoError::NotFound(_) => AppError::NotFound("Product not found".into()),
                other => other.into(),
            },
        )?;
        self.cache.invalidate_catalogs().await;
        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let deleted = product_repo::delete(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::NotFound("Product not found".into()));
        }
        self.cache.invalidate_catalogs().await;
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}
