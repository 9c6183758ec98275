//! Order lifecycle module
//!
//! Token issuance ([`token`]) and the lifecycle orchestration
//! ([`service`]) that ties persistence, cache invalidation and realtime
//! broadcast together.

pub mod service;
pub mod token;

pub use service::OrderService;

use crate::db::repository::RepoError;
use crate::error::AppError;
use shared::models::OrderStatus;
use thiserror::Error;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Product is not available: {0}")]
    ProductUnavailable(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Stored token number is malformed: {0}")]
    MalformedSequence(String),

    #[error("Token allocation conflict persisted through {0} attempts")]
    TokenConflict(u32),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            // Client input errors (400) — original contract answers both
            // product failures with a 400, not a 404
            OrderError::ProductNotFound(_) => AppError::Validation("Product not found".into()),
            OrderError::ProductUnavailable(_) => {
                AppError::Validation("Product is not available".into())
            }

            OrderError::OrderNotFound(_) => AppError::NotFound("Order not found".into()),

            OrderError::IllegalTransition { from, to } => {
                AppError::BusinessRule(format!("Illegal status transition: {from} -> {to}"))
            }

            // Internal invariant violations (500); detail is logged at
            // the response boundary
            OrderError::MalformedSequence(token) => {
                AppError::Internal(format!("Malformed token sequence state: {token}"))
            }
            OrderError::TokenConflict(attempts) => AppError::Internal(format!(
                "Token allocation conflict persisted through {attempts} attempts"
            )),

            OrderError::Repo(e) => e.into(),
        }
    }
}
