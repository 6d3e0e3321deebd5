//! Broadcast channel for session events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every session
//! state change publishes a [`SessionEvent`] through the bus, and all
//! WebSocket connections subscribe to receive filtered events.

use tokio::sync::broadcast;

use super::SessionEvent;

/// Fan-out of [`SessionEvent`]s to every open WebSocket.
///
/// Receivers that fall more than `capacity` events behind skip the oldest
/// ones and see a `Lagged` error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event` and returns how many receivers got it. Without
    /// receivers the event is dropped.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let event_type = event.event_type_str();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event_type, delivered, "session event published");
        delivered
    }

    /// Receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Number of open receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
