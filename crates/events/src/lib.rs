//! Store change notifications.
//!
//! The record store publishes one [`StoreEvent`] per successful mutation so
//! that list views can refresh from the store's own bookkeeping instead of
//! tracking records themselves.

use serde::Serialize;
use tokio::sync::broadcast;

/// Default channel capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 64;

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Destroyed,
}

/// A single mutation observed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    /// Record kind, e.g. `"idea"`
    pub kind: &'static str,
    /// Identity of the affected record
    pub id: u64,
    pub change: ChangeKind,
}

impl StoreEvent {
    pub fn new(kind: &'static str, id: u64, change: ChangeKind) -> Self {
        Self { kind, id, change }
    }
}

/// Broadcast bus for [`StoreEvent`]s. Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus holding at most `capacity` undelivered events per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many receivers saw it.
    pub fn publish(&self, event: StoreEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(
                    target: "ideas-events",
                    kind = event.kind,
                    id = event.id,
                    change = ?event.change,
                    "store event dropped, no subscribers"
                );
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(StoreEvent::new("idea", 1, ChangeKind::Created)), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let delivered = bus.publish(StoreEvent::new("idea", 3, ChangeKind::Destroyed));
        assert_eq!(delivered, 2);

        let event = first.recv().await.unwrap();
        assert_eq!(event, StoreEvent::new("idea", 3, ChangeKind::Destroyed));
        assert_eq!(second.recv().await.unwrap().change, ChangeKind::Destroyed);
    }

    #[test]
    fn events_serialize_with_lowercase_change() {
        let event = StoreEvent::new("idea", 7, ChangeKind::Updated);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["change"], "updated");
        assert_eq!(json["kind"], "idea");
        assert_eq!(json["id"], 7);
    }
}
