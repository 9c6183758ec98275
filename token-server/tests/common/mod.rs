//! Shared test fixtures
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use shared::models::{Product, ProductCreate, User, UserRole};
use token_server::AppState;
use token_server::cache::{CacheError, CacheResult, CacheStore, MemoryCache};
use token_server::db::MIGRATOR;
use token_server::db::repository::{product as product_repo, user as user_repo};

/// Fresh in-memory database with migrations applied. One connection so
/// every handle sees the same memory store.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn test_state() -> AppState {
    AppState::build(test_pool().await, Arc::new(MemoryCache::new()))
}

pub async fn seed_user(state: &AppState, name: &str, email: &str) -> User {
    user_repo::create(&state.pool, name, email, UserRole::User)
        .await
        .unwrap()
}

pub async fn seed_admin(state: &AppState, name: &str, email: &str) -> User {
    user_repo::create(&state.pool, name, email, UserRole::Admin)
        .await
        .unwrap()
}

pub async fn seed_product(
    state: &AppState,
    created_by: i64,
    name: &str,
    price: f64,
    availability: bool,
) -> Product {
    product_repo::create(
        &state.pool,
        ProductCreate {
            name: name.to_string(),
            price,
            availability,
            description: None,
            category: "meals".to_string(),
        },
        created_by,
    )
    .await
    .unwrap()
}

/// Drive one request through the router and decode the JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<i64>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header("x-user-id", id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Cache store whose every operation fails, for fail-soft coverage
pub struct BrokenCache;

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Backend("cache store is down".into()))
    }
    async fn set_with_ttl(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Backend("cache store is down".into()))
    }
    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Backend("cache store is down".into()))
    }
}
