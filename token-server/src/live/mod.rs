//! StatusHub — 订单状态实时分发
//!
//! One broadcast channel per order, named by the public order id.
//! Clients join a channel over the WebSocket endpoint; the lifecycle
//! manager publishes into it on every status change.
//!
//! ```text
//! OrderService.update_status
//!       │ StatusUpdate
//!       ▼
//! StatusHub
//!   └── channels: order_id → broadcast::Sender<StatusUpdate>
//!             │
//!             ▼
//!       WS sessions (join → forward)
//! ```
//!
//! Delivery is best-effort, at-most-once: no acknowledgement, no retry,
//! no persistence of undelivered events. Whoever is not subscribed at
//! publish time re-queries the order through the read path.

use dashmap::DashMap;
use shared::StatusUpdate;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel 容量 — 单个订单的状态事件很稀疏，小缓冲足够
const BROADCAST_CAPACITY: usize = 16;

/// Per-order status broadcast hub
#[derive(Clone, Default)]
pub struct StatusHub {
    /// order_id → sender
    channels: Arc<DashMap<String, broadcast::Sender<StatusUpdate>>>,
}

impl StatusHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join an order's channel, creating it on first subscription
    pub fn subscribe(&self, order_id: &str) -> broadcast::Receiver<StatusUpdate> {
        self.channels
            .entry(order_id.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Publish a status change to the order's channel
    ///
    /// Returns the number of subscribers the event reached; zero when
    /// nobody is listening. Channels without receivers are dropped so
    /// completed orders don't leak entries.
    pub fn publish(&self, order_id: &str, update: StatusUpdate) -> usize {
        let delivered = match self.channels.get(order_id) {
            Some(tx) => tx.send(update).unwrap_or(0),
            None => 0,
        };
        if delivered == 0 {
            self.channels
                .remove_if(order_id, |_, tx| tx.receiver_count() == 0);
        }
        delivered
    }

    /// Number of live channels (diagnostics)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus;

    #[tokio::test]
    async fn subscriber_receives_published_update() {
        let hub = StatusHub::new();
        let mut rx = hub.subscribe("order-1");

        let update = StatusUpdate::new("order-1", OrderStatus::Ready);
        let delivered = hub.publish("order-1", update.clone());
        assert_eq!(delivered, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, update);
        assert_eq!(received.message, "Your order status is now: ready");
    }

    #[tokio::test]
    async fn publish_is_scoped_to_its_channel() {
        let hub = StatusHub::new();
        let mut rx_other = hub.subscribe("order-2");

        hub.publish("order-1", StatusUpdate::new("order-1", OrderStatus::Ready));

        assert!(matches!(
            rx_other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_lost() {
        let hub = StatusHub::new();
        let delivered = hub.publish(
            "order-1",
            StatusUpdate::new("order-1", OrderStatus::Preparing),
        );
        assert_eq!(delivered, 0);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn dropped_subscribers_release_the_channel() {
        let hub = StatusHub::new();
        let rx = hub.subscribe("order-1");
        assert_eq!(hub.channel_count(), 1);
        drop(rx);

        hub.publish("order-1", StatusUpdate::new("order-1", OrderStatus::Ready));
        assert_eq!(hub.channel_count(), 0);
    }
}
