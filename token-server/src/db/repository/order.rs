//! Order Repository
//!
//! Orders are append-only apart from the status column. The resolved
//! view JOINs the owning user and LEFT JOINs the product (products are
//! hard-deletable, old orders must survive them).

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderCreate, OrderDetailRow, OrderStatus};
use shared::util::now_millis;
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, order_id, user_id, product_id, price, payment_status, token_number, status, created_at, updated_at FROM pickup_order";

const ORDER_VIEW_SELECT: &str = "SELECT o.order_id, o.price, o.payment_status, o.token_number, o.status, o.created_at, o.updated_at, \
     u.id AS user_id, u.name AS user_name, u.email AS user_email, \
     p.id AS product_id, p.name AS product_name, p.price AS product_price, p.category AS product_category \
     FROM pickup_order o \
     JOIN user u ON o.user_id = u.id \
     LEFT JOIN product p ON o.product_id = p.id";

/// The most recently created order — the token sequencer derives the next
/// token from it. `id DESC` breaks millisecond ties in insertion order.
pub async fn find_last_created(pool: &SqlitePool) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC, id DESC LIMIT 1");
    let row = sqlx::query_as::<_, Order>(&sql).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn find_by_order_id(pool: &SqlitePool, order_id: &str) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE order_id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO pickup_order (order_id, user_id, product_id, price, payment_status, token_number, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(&data.order_id)
    .bind(data.user_id)
    .bind(data.product_id)
    .bind(data.price)
    .bind(data.payment_status)
    .bind(&data.token_number)
    .bind(data.status)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_order_id(pool, &data.order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Resolved view of a single order
pub async fn find_detail(pool: &SqlitePool, order_id: &str) -> RepoResult<Option<OrderDetailRow>> {
    let sql = format!("{ORDER_VIEW_SELECT} WHERE o.order_id = ?");
    let row = sqlx::query_as::<_, OrderDetailRow>(&sql)
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// One user's order history, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<OrderDetailRow>> {
    let sql = format!("{ORDER_VIEW_SELECT} WHERE o.user_id = ? ORDER BY o.created_at DESC, o.id DESC");
    let rows = sqlx::query_as::<_, OrderDetailRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every order, newest first (admin view)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OrderDetailRow>> {
    let sql = format!("{ORDER_VIEW_SELECT} ORDER BY o.created_at DESC, o.id DESC");
    let rows = sqlx::query_as::<_, OrderDetailRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Move an order's status in place
pub async fn update_status(
    pool: &SqlitePool,
    order_id: &str,
    status: OrderStatus,
) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE pickup_order SET status = ?1, updated_at = ?2 WHERE order_id = ?3")
        .bind(status)
        .bind(now)
        .bind(order_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(())
}

/// Total number of orders (test/diagnostic helper)
pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pickup_order")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
