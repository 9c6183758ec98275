//! Order API
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 | 登录用户 |
//! | /api/orders/my | GET | 本人订单历史 | 登录用户 |
//! | /api/orders | GET | 全部订单 | admin |
//! | /api/orders/{id}/status | PUT | 推进订单状态 | admin |

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::{OrderStatus, OrderView};

use crate::api::identity::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create).get(list_all))
        .route("/api/orders/my", get(list_my))
        .route("/api/orders/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    product_id: i64,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

/// POST /api/orders — place an order, token assigned sequentially
async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let order = state
        .orders
        .create_order(payload.product_id, user.id)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::<OrderView>::ok(order))))
}

/// GET /api/orders/my — caller's order history, cache-aside
async fn list_my(State(state): State<AppState>, user: CurrentUser) -> AppResult<impl IntoResponse> {
    let (orders, source) = state
        .orders
        .list_for_user(user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::listed(source, orders)))
}

/// GET /api/orders — every order, cache-aside
async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let (orders, source) = state.orders.list_all().await.map_err(AppError::from)?;
    Ok(Json(ApiResponse::listed(source, orders)))
}

/// PUT /api/orders/{id}/status — advance the lifecycle, broadcast to the
/// order's channel
async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    user.require_admin()?;
    let order = state
        .orders
        .update_status(&id, payload.status)
        .await
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::<OrderView>::ok(order)))
}
