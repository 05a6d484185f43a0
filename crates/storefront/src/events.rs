//! Change notifications.
//!
//! Every successful mutation of shared state is announced on a broadcast
//! channel so observers learn about it without polling. The server runs
//! [`log_events`] as its standing observer.

use cannabiabuds_core::{ProductId, Role};
use serde::Serialize;
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    ProductCreated { id: ProductId },
    ProductUpdated { id: ProductId },
    ProductDeleted { id: ProductId },
    CartChanged { item_count: u64 },
    /// `role` is `None` after logout.
    SessionChanged { role: Option<Role> },
}

/// Fan-out publisher for [`StoreEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: StoreEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            tracing::debug!(?event, "store event with no subscribers");
        }
    }

    /// Receive every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

/// Log every event from `events` until the bus is dropped.
///
/// Returns the number of events logged.
pub async fn log_events(mut events: broadcast::Receiver<StoreEvent>) -> u64 {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::info!(?event, "store changed");
                logged += 1;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => return logged,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::CartChanged { item_count: 3 });

        assert_eq!(rx.recv().await.unwrap(), StoreEvent::CartChanged { item_count: 3 });
    }

    #[tokio::test]
    async fn test_log_events_drains_until_bus_is_dropped() {
        let bus = EventBus::new();
        let logger = tokio::spawn(log_events(bus.subscribe()));

        bus.publish(StoreEvent::ProductDeleted { id: ProductId::new("3") });
        bus.publish(StoreEvent::CartChanged { item_count: 0 });
        drop(bus);

        assert_eq!(logger.await.unwrap(), 2);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(StoreEvent::SessionChanged { role: None });
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(StoreEvent::ProductDeleted {
            id: ProductId::new("7"),
        })
        .unwrap();
        assert_eq!(json["event"], "product_deleted");
        assert_eq!(json["id"], "7");
    }
}
