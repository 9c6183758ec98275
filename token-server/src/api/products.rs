//! Product API
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/products | GET | 可购商品目录 | 公开 |
//! | /api/products | POST | 新建商品 | admin |
//! | /api/products/all | GET | 全部商品 | admin |
//! | /api/products/{id} | PUT | 更新商品 | admin |
//! | /api/products/{id} | DELETE | 删除商品 | admin |

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use shared::ApiResponse;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::identity::CurrentUser;
use crate::error::AppResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_public).post(create))
        .route("/api/products/all", get(list_all))
        .route("/api/products/{id}", put(update).delete(delete))
}

/// GET /api/products — available products, cache-aside
async fn list_public(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (products, source) = state.catalog.list_public().await?;
    Ok(Json(ApiResponse::listed(source, products)))
}

/// GET /api/products/all — every product, cache-aside
async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let (products, source) = state.catalog.list_all().await?;
    Ok(Json(ApiResponse::listed(source, products)))
}

/// POST /api/products
async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let product = state.catalog.create(payload, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::<Product>::ok(product)),
    ))
}

/// PUT /api/products/{id}
async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let product = state.catalog.update(id, payload).await?;
    Ok(Json(ApiResponse::<Product>::ok(product)))
}

/// DELETE /api/products/{id}
async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    state.catalog.delete(id).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Product deleted successfully",
    )))
}
