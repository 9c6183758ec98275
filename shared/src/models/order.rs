//! Order Model
//!
//! An order is written once at placement and from then on only its
//! `status` field moves, along the fixed lifecycle below. The pickup
//! token (`T<n>`) is the human-facing sequential identifier, distinct
//! from the `order_id` UUID.

use serde::{Deserialize, Serialize};

// ============================================================================
// Status enums
// ============================================================================

/// Payment status — settlement happens synchronously upstream, so orders
/// are persisted with `Done`; the other states exist for imported data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Pending,
    #[default]
    Done,
    Failed,
}

/// Order lifecycle status
///
/// 状态只能沿固定路径前进：pending → preparing → ready → completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    /// Legal transition edges. Everything else (no-ops and backward moves
    /// included) is rejected by the lifecycle manager.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Completed)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order entity
// ============================================================================

/// Order row as persisted
///
/// `id` is the database-assigned key (insertion-ordered, the token
/// sequencer relies on that); `order_id` is the public UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_id: String,
    pub user_id: i64,
    pub product_id: i64,
    /// Price snapshot captured at creation — later product price changes
    /// must not touch past orders
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub token_number: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert payload for a new order
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_id: String,
    pub user_id: i64,
    pub product_id: i64,
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub token_number: String,
    pub status: OrderStatus,
}

// ============================================================================
// Resolved views (JOIN rows)
// ============================================================================

/// Flat row produced by the order view JOIN
///
/// Product columns are nullable: products are hard-deletable and old
/// orders keep pointing at them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderDetailRow {
    pub order_id: String,
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub token_number: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
    pub product_category: Option<String>,
}

/// Owning user reference in the response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Product reference in the response payload (current catalog data, not
/// the order snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
}

/// Fully resolved order as serialized to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub user: UserRef,
    /// `null` once the product has been removed from the catalog
    pub product: Option<ProductRef>,
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub token_number: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<OrderDetailRow> for OrderView {
    fn from(row: OrderDetailRow) -> Self {
        let product = match (row.product_id, row.product_name, row.product_price) {
            (Some(id), Some(name), Some(price)) => Some(ProductRef {
                id,
                name,
                price,
                category: row.product_category.unwrap_or_default(),
            }),
            _ => None,
        };
        OrderView {
            order_id: row.order_id,
            user: UserRef {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            product,
            price: row.price,
            payment_status: row.payment_status,
            token_number: row.token_number,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_legal() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Completed));
    }

    #[test]
    fn skips_noops_and_backward_moves_are_illegal() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Ready));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Completed));
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Ready.can_transition(OrderStatus::Ready));
        assert!(!OrderStatus::Completed.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Preparing).unwrap(),
            "\"preparing\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Done).unwrap(),
            "\"done\""
        );
    }
}
