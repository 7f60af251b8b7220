//! Cart change notifications.
//!
//! The cart manager only emits; it never tracks who listens. Any number of
//! independent views (a header badge, a cart page) subscribe to a
//! [`CartEvents`] bus and re-read the cart when notified.

use tokio::sync::broadcast;

/// Capacity of the notification channel. Slow subscribers that fall further
/// behind than this see `RecvError::Lagged` and should simply re-read.
const CHANNEL_CAPACITY: usize = 64;

/// Signal emitted after every successful cart write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart record was rewritten.
    Updated {
        /// Total units in the cart after the write.
        item_count: u64,
    },
}

/// Publish/subscribe bus for [`CartEvent`]s.
///
/// Cheaply cloneable; clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct CartEvents {
    tx: broadcast::Sender<CartEvent>,
}

impl CartEvents {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Register a new subscriber.
    ///
    /// The receiver sees every event emitted after this call. It can be
    /// polled synchronously with `try_recv` or awaited with `recv`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Fire-and-forget emit. Having no subscribers is not an error.
    pub fn emit(&self, event: CartEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::trace!(?event, delivered, "Cart event emitted");
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    #[test]
    fn test_emit_without_subscribers() {
        let events = CartEvents::new();
        events.emit(CartEvent::Updated { item_count: 1 });
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn test_every_subscriber_receives() {
        let events = CartEvents::new();
        let mut badge = events.subscribe();
        let mut page = events.clone().subscribe();

        events.emit(CartEvent::Updated { item_count: 3 });

        assert_eq!(badge.try_recv().unwrap(), CartEvent::Updated { item_count: 3 });
        assert_eq!(page.try_recv().unwrap(), CartEvent::Updated { item_count: 3 });
        assert!(matches!(badge.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let events = CartEvents::new();
        events.emit(CartEvent::Updated { item_count: 1 });
        let mut late = events.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_async_receive() {
        let events = CartEvents::new();
        let mut rx = events.subscribe();
        events.emit(CartEvent::Updated { item_count: 2 });
        assert_eq!(rx.recv().await.unwrap(), CartEvent::Updated { item_count: 2 });
    }
}
