//! # Event bus for broadcasting channel events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the connection worker to any number of
//! consumers (the subscriber fan-out, tests, ad-hoc receivers).
//!
//! ## Architecture
//! ```text
//! Publisher (one):                    Consumers (many):
//!                                  ┌──────► monitor listener ──► SubscriberSet
//!   ConnectionWorker ───► Bus ─────┤
//!                 (broadcast chan) └──────► test receivers / ad-hoc taps
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls
//!   `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip the
//!   `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at
//!   send time.

use tokio::sync::broadcast;

use super::event::ChannelEvent;

/// Broadcast channel for channel events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] with a `publish`/`subscribe`
/// API. Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<ChannelEvent>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<ChannelEvent>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers the event is dropped; this function still
    /// returns immediately.
    pub fn publish(&self, ev: ChannelEvent) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// Each call creates an independent receiver; a receiver only gets events
    /// sent after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Status;

    #[tokio::test]
    async fn test_publish_reaches_all_receivers() {
        let bus = Bus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ChannelEvent::message("alerts", "cpu high"));

        let a = rx1.recv().await.unwrap();
        let b = rx2.recv().await.unwrap();
        assert_eq!(a.channel.as_ref(), "alerts");
        assert_eq!(b.payload.as_ref(), "cpu high");
        assert_eq!(a.seq, b.seq);
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(4);
        // No receivers yet: must not panic or block.
        bus.publish(ChannelEvent::waiting());

        let mut rx = bus.subscribe();
        bus.publish(ChannelEvent::message("c", "after"));
        let ev = rx.recv().await.unwrap();
        // Receiver only sees events published after subscribing.
        assert_eq!(ev.status, Status::Success);
        assert_eq!(ev.payload.as_ref(), "after");
    }
}
