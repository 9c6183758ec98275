//! Realtime wire messages
//!
//! 协议:
//! - Client → Server: [`JoinCommand`] — enter the broadcast channel of one
//!   order (the id is handed out by the create-order response)
//! - Server → Client: [`StatusUpdate`] — pushed on every status change of
//!   a joined order
//!
//! Delivery is best-effort, at-most-once: subscribers that join late or
//! lag miss events and re-query the order through the read path instead.

use crate::models::OrderStatus;
use serde::{Deserialize, Serialize};

/// Client request to join an order's channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinCommand {
    /// Public order id (UUID) naming the channel
    pub join: String,
}

/// Status-change event pushed to a channel's subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: String,
    pub status: OrderStatus,
    pub message: String,
}

impl StatusUpdate {
    pub fn new(order_id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            order_id: order_id.into(),
            status,
            message: format!("Your order status is now: {status}"),
        }
    }
}
