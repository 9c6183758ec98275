//! OrderService — order lifecycle orchestration
//!
//! Every mutation follows the same load-bearing ordering: persist first,
//! invalidate the dependent cache keys second, broadcast last. Inverting
//! persist/invalidate would let a racing reader repopulate the cache with
//! pre-mutation data; broadcasting before invalidating would let a
//! subscriber re-query into a stale entry.

use super::{OrderError, token};
use crate::cache::{CacheAside, keys};
use crate::db::repository::{order as order_repo, product as product_repo};
use crate::live::StatusHub;
use shared::models::{OrderCreate, OrderStatus, OrderView, PaymentStatus};
use shared::{DataSource, StatusUpdate};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Attempts at token assignment before giving up on a persistent
/// uniqueness conflict
const MAX_TOKEN_RETRIES: u32 = 3;

/// Order lifecycle manager
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    cache: CacheAside,
    hub: StatusHub,
}

impl OrderService {
    pub fn new(pool: SqlitePool, cache: CacheAside, hub: StatusHub) -> Self {
        Self { pool, cache, hub }
    }

    /// Place an order for one product
    ///
    /// The product must exist and be available (both are client errors).
    /// The persisted price is a snapshot: later catalog price changes do
    /// not touch past orders. Payment is settled synchronously upstream,
    /// so the order lands with `payment_status = done`.
    pub async fn create_order(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<OrderView, OrderError> {
        let product = product_repo::find_by_id(&self.pool, product_id)
            .await?
            .ok_or(OrderError::ProductNotFound(product_id))?;
        if !product.availability {
            return Err(OrderError::ProductUnavailable(product_id));
        }

        let order_id = Uuid::new_v4().to_string();

        // Read-max + insert races with concurrent creators; the unique
        // index on token_number arbitrates, losers re-read and retry.
        let mut attempt = 0;
        let order = loop {
            attempt += 1;
            let token_number = token::next_token(&self.pool).await?;

            let result = order_repo::create(
                &self.pool,
                OrderCreate {
                    order_id: order_id.clone(),
                    user_id,
                    product_id,
                    price: product.price,
                    payment_status: PaymentStatus::Done,
                    token_number: token_number.clone(),
                    status: OrderStatus::Pending,
                },
            )
            .await;

            match result {
                Ok(order) => break order,
                Err(e) if e.is_duplicate_of("token_number") => {
                    if attempt >= MAX_TOKEN_RETRIES {
                        tracing::error!(
                            order_id = %order_id,
                            token = %token_number,
                            attempts = attempt,
                            "Token allocation conflict not resolved by retrying"
                        );
                        return Err(OrderError::TokenConflict(attempt));
                    }
                    tracing::warn!(
                        order_id = %order_id,
                        token = %token_number,
                        attempt = attempt,
                        "Token already taken, retrying against fresh maximum"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        };

        let view = self.resolve(&order.order_id).await?;

        // No compensation if this fails after the insert: the order is
        // durable and the short TTL bounds the staleness window.
        self.cache.invalidate_orders(user_id).await;

        tracing::info!(
            order_id = %view.order_id,
            token = %view.token_number,
            user_id = user_id,
            "Order created"
        );
        Ok(view)
    }

    /// Move an order along its status lifecycle
    ///
    /// Only the forward edges pending → preparing → ready → completed are
    /// accepted; anything else is an [`OrderError::IllegalTransition`].
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderView, OrderError> {
        let order = order_repo::find_by_order_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if !order.status.can_transition(status) {
            return Err(OrderError::IllegalTransition {
                from: order.status,
                to: status,
            });
        }

        order_repo::update_status(&self.pool, order_id, status).await?;
        let view = self.resolve(order_id).await?;

        self.cache.invalidate_orders(order.user_id).await;

        let delivered = self
            .hub
            .publish(order_id, StatusUpdate::new(order_id, status));

        tracing::info!(
            order_id = %order_id,
            status = %status,
            subscribers = delivered,
            "Order status updated"
        );
        Ok(view)
    }

    /// One user's order history through the cache-aside layer
    pub async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<(Vec<OrderView>, DataSource), OrderError> {
        let key = keys::user_orders(user_id);
        self.cache
            .get_or_load(&key, keys::ORDERS_TTL, || async move {
                let rows = order_repo::find_by_user(&self.pool, user_id).await?;
                Ok(rows.into_iter().map(OrderView::from).collect())
            })
            .await
    }

    /// Every order, unscoped (admin read)
    pub async fn list_all(&self) -> Result<(Vec<OrderView>, DataSource), OrderError> {
        self.cache
            .get_or_load(keys::ORDERS_ADMIN, keys::ORDERS_TTL, || async move {
                let rows = order_repo::find_all(&self.pool).await?;
                Ok(rows.into_iter().map(OrderView::from).collect())
            })
            .await
    }

    async fn resolve(&self, order_id: &str) -> Result<OrderView, OrderError> {
        let row = order_repo::find_detail(&self.pool, order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        Ok(OrderView::from(row))
    }
}
