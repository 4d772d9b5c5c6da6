//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`ChannelEvent`] to multiple
//! subscribers **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(event)` returns immediately.
//! - Per-subscriber FIFO (queue order), which preserves per-channel event
//!   order for every consumer.
//! - Panics inside subscribers are caught and reported (isolation).
//! - Overflow drops are counted per subscriber; [`SubscriberSet::dropped`]
//!   exposes the running total.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow; events are dropped for
//!   that subscriber only.
//!
//! ## Diagram
//! ```text
//!    emit(ChannelEvent)
//!        │                  (Arc-clone per subscriber)
//!        ├───────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├───────────► [queue S2] ─► worker S2 ─► on_event()
//!        └───────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::ChannelEvent;

use super::Subscribe;

/// Fan-out endpoint for one subscriber: its queue plus drop accounting.
struct Outlet {
    name: &'static str,
    queue: mpsc::Sender<Arc<ChannelEvent>>,
    dropped: AtomicU64,
}

impl Outlet {
    fn offer(&self, ev: Arc<ChannelEvent>) {
        let refusal = match self.queue.try_send(ev) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(_)) => "queue full",
            Err(mpsc::error::TrySendError::Closed(_)) => "worker closed",
        };
        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        eprintln!(
            "[buswatch] subscriber '{}' dropped event ({refusal}, {total} dropped so far)",
            self.name
        );
    }
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    outlets: Vec<Outlet>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut outlets = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            outlets.push(Outlet {
                name: sub.name(),
                queue: tx,
                dropped: AtomicU64::new(0),
            });
            workers.push(tokio::spawn(drive(sub, rx)));
        }

        Self { outlets, workers }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is full or closed, the event is dropped for
    /// it, the subscriber's drop counter grows, and a warning names it.
    pub fn emit(&self, event: ChannelEvent) {
        let ev = Arc::new(event);
        for outlet in &self.outlets {
            outlet.offer(Arc::clone(&ev));
        }
    }

    /// Total events dropped across all subscribers since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.outlets
            .iter()
            .map(|o| o.dropped.load(Ordering::Relaxed))
            .sum()
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.outlets);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outlets.len()
    }
}

/// Worker loop for one subscriber: drain the queue until it closes,
/// containing any panic so one bad subscriber cannot stall the set.
async fn drive(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<ChannelEvent>>) {
    while let Some(ev) = rx.recv().await {
        let call = std::panic::AssertUnwindSafe(sub.on_event(ev.as_ref()));
        if let Err(panic_err) = call.catch_unwind().await {
            eprintln!(
                "[buswatch] subscriber '{}' panicked: {:?}",
                sub.name(),
                panic_err
            );
        }
    }
}
