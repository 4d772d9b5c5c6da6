//! # Channel events emitted by the connection worker.
//!
//! The [`Status`] enum classifies the three event variants:
//! - [`Status::Success`] — one message was received on a channel
//! - [`Status::Waiting`] — a connect/subscribe/receive attempt failed and a
//!   reconnect is pending (connection-scoped, not tied to any channel)
//! - [`Status::Error`] — the target is malformed; the worker gives up
//!
//! The [`ChannelEvent`] struct carries the channel name, the decoded payload,
//! and optional metadata such as a failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events for one channel are emitted in bus delivery order;
//! `seq` restores the exact global emission order if a consumer needs it.
//!
//! ## Example
//! ```rust
//! use buswatch::{ChannelEvent, Status};
//!
//! let ev = ChannelEvent::message("alerts", "cpu high");
//! assert_eq!(ev.status, Status::Success);
//! assert_eq!(ev.channel.as_ref(), "alerts");
//! assert_eq!(ev.payload.as_ref(), "cpu high");
//!
//! let ev = ChannelEvent::waiting();
//! assert!(ev.channel.is_empty());
//! assert_eq!(ev.status.as_label(), "waiting");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of channel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A message was received on a subscribed channel.
    ///
    /// Sets:
    /// - `channel`: channel name (UTF-8)
    /// - `payload`: message payload (UTF-8)
    Success,

    /// A connection attempt failed; the worker will retry after a backoff
    /// delay. `channel` and `payload` are empty — this is a connection-pending
    /// marker, not a per-channel message.
    ///
    /// Sets:
    /// - `reason`: failure description
    Waiting,

    /// The subscription target is malformed (configuration error).
    /// Emitted exactly once; the worker does not retry.
    ///
    /// Sets:
    /// - `reason`: what was wrong with the target
    Error,
}

impl Status {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use buswatch::Status;
    ///
    /// assert_eq!(Status::Success.as_label(), "success");
    /// assert_eq!(Status::Error.as_label(), "error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Waiting => "waiting",
            Status::Error => "error",
        }
    }
}

/// One event on the monitoring stream.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `channel`/`payload`: set for `Success`, empty otherwise
/// - `reason`: set for `Waiting`/`Error`
///
/// Events are created by the worker and handed to consumers by value; there
/// is no shared mutable state behind them (`Arc<str>` fields make clones
/// through the broadcast channel cheap).
#[derive(Debug, Clone)]
pub struct ChannelEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Channel the message arrived on (empty for connection-scoped events).
    pub channel: Arc<str>,
    /// Decoded message payload (empty for connection-scoped events).
    pub payload: Arc<str>,
    /// Event classification.
    pub status: Status,
    /// Human-readable failure reason for `Waiting`/`Error`.
    pub reason: Option<Arc<str>>,
}

impl ChannelEvent {
    fn new(status: Status, channel: Arc<str>, payload: Arc<str>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            channel,
            payload,
            status,
            reason: None,
        }
    }

    /// Creates a `Success` event for one received message.
    pub fn message(channel: impl Into<Arc<str>>, payload: impl Into<Arc<str>>) -> Self {
        Self::new(Status::Success, channel.into(), payload.into())
    }

    /// Creates a connection-pending `Waiting` marker (empty channel/payload).
    pub fn waiting() -> Self {
        Self::new(Status::Waiting, "".into(), "".into())
    }

    /// Creates a terminal `Error` event for a malformed target.
    pub fn config_error(reason: impl Into<Arc<str>>) -> Self {
        Self::new(Status::Error, "".into(), "".into()).with_reason(reason)
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for per-message events (the only kind that updates liveness).
    #[inline]
    pub fn is_message(&self) -> bool {
        matches!(self.status, Status::Success)
    }
}
