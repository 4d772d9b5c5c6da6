//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging event consumers into the
//! monitor: display layers, log writers, the liveness tracker. Each
//! subscriber is driven by a dedicated worker loop fed by a bounded queue
//! owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet), so a
//! slow consumer never blocks the connection worker or other subscribers.
//!
//! ## Contract
//! - Implementations may be slow (UI updates, file appends) — they do not
//!   block the publisher nor each other.
//! - Each subscriber declares its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. On overflow, events for that subscriber
//!   are dropped (warn on stderr).
//! - `on_event` is invoked from a worker task, never from the caller's
//!   thread; implementations touching shared display state must synchronize.

use async_trait::async_trait;

use crate::events::ChannelEvent;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime (prefer async I/O and cooperative
/// waits).
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use buswatch::{ChannelEvent, Status, Subscribe};
///
/// struct Counter;
///
/// #[async_trait]
/// impl Subscribe for Counter {
///     async fn on_event(&self, ev: &ChannelEvent) {
///         if ev.status == Status::Success {
///             // count the message...
///         }
///     }
///
///     fn name(&self) -> &'static str { "counter" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &ChannelEvent);

    /// Human-readable name (for drop warnings).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
