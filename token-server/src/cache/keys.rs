//! Cache key / TTL table
//!
//! | Key | TTL | Invalidated by |
//! |-----|-----|----------------|
//! | `catalog:public` | 1h | any product create/update/delete |
//! | `catalog:admin` | 1h | any product create/update/delete |
//! | `orders:<userId>` | 5min | that user's order create; status update on any of their orders |
//! | `orders:admin` | 5min | any order create; any status update |
//!
//! 目录数据变化少，长 TTL 提高命中率；订单状态变化频繁，短 TTL 只是
//! 漏失效时的兜底。Correctness never rides on the TTL: every mutation
//! invalidates its dependent keys before returning.

use std::time::Duration;

pub const CATALOG_PUBLIC: &str = "catalog:public";
pub const CATALOG_ADMIN: &str = "catalog:admin";
pub const ORDERS_ADMIN: &str = "orders:admin";

pub const CATALOG_TTL: Duration = Duration::from_secs(3600);
pub const ORDERS_TTL: Duration = Duration::from_secs(300);

/// Per-user order history key
pub fn user_orders(user_id: i64) -> String {
    format!("orders:{user_id}")
}
