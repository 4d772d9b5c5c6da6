//! # Monitor: wires the worker, the bus, and the consumers together.
//!
//! The [`Monitor`] owns the event [`Bus`], a [`SubscriberSet`], and the
//! [`LivenessTracker`]. `start(target)` spawns the connection worker, the
//! bus listener, and the stale scanner; `stop()` cancels and joins all
//! three, then clears liveness state so a later run starts clean.
//!
//! ## High-level architecture
//! ```text
//! start(target):
//!   ├─► listener: Bus.subscribe() ─► SubscriberSet::emit(ev)  (fire-and-forget)
//!   ├─► ConnectionWorker::run(target, child_token)
//!   └─► LivenessTracker::spawn_scanner(child_token)
//!
//! Event flow:
//!   ConnectionWorker ── publish(ChannelEvent) ──► Bus ──► listener ──► SubscriberSet
//!                                                             ┌─────────┬──┴──────┐
//!                                                             ▼         ▼         ▼
//!                                                      LivenessTracker LogWriter  UI
//!
//! stop():
//!   token.cancel()
//!     ├─► worker joins   (no events emitted past this point)
//!     ├─► scanner joins  (no alerts past this point)
//!     ├─► listener drains the bus, then joins
//!     └─► tracker.reset()
//! ```
//!
//! ## Rules
//! - `start` while running → [`RuntimeError::AlreadyRunning`]; the old run
//!   is never silently replaced.
//! - `stop` is idempotent; calling it when idle is a no-op.
//! - `stop` returns only after the worker task has fully exited, so a
//!   subsequent `start` cannot race residual activity from the prior run.

use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::liveness::LivenessTracker;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::worker::{ConnectionWorker, SubscriptionTarget, WorkerState};

/// Tasks and cancellation scope of one monitoring run.
struct RunHandles {
    token: CancellationToken,
    worker: JoinHandle<()>,
    scanner: JoinHandle<()>,
    listener: JoinHandle<()>,
    state: watch::Receiver<WorkerState>,
}

/// Coordinates the connection worker, event delivery, and liveness scanning.
pub struct Monitor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    tracker: Arc<LivenessTracker>,
    run: Mutex<Option<RunHandles>>,
}

impl Monitor {
    /// Creates a monitor with the given config and subscribers.
    ///
    /// `tracker` must be the instance that should receive events; it is
    /// added to the subscriber set if the caller did not include it.
    /// Must be called within a tokio runtime (subscriber workers are
    /// spawned here).
    pub fn new(
        cfg: Config,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
        tracker: Arc<LivenessTracker>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());

        let has_tracker = subscribers
            .iter()
            .any(|s| (Arc::as_ptr(s) as *const ()) == (Arc::as_ptr(&tracker) as *const ()));
        if !has_tracker {
            subscribers.push(tracker.clone());
        }

        let subs = Arc::new(SubscriberSet::new(subscribers));
        Self {
            cfg,
            bus,
            subs,
            tracker,
            run: Mutex::new(None),
        }
    }

    /// Starts monitoring `target`. Non-blocking: the worker, the scanner,
    /// and the bus listener are spawned and this returns immediately.
    ///
    /// A malformed target is *not* an `Err` here — it surfaces as a single
    /// `Error` event on the stream, keeping event consumption the one place
    /// failures are observed.
    pub async fn start(&self, target: SubscriptionTarget) -> Result<(), RuntimeError> {
        let mut run = self.run.lock().await;
        if run.is_some() {
            return Err(RuntimeError::AlreadyRunning);
        }

        let token = CancellationToken::new();
        // Subscribe before the worker spawns so no event can be missed.
        let listener = self.spawn_listener(self.bus.subscribe(), token.child_token());

        let worker = ConnectionWorker::new(self.bus.clone(), &self.cfg);
        let state = worker.state_watch();
        let worker = tokio::spawn(worker.run(target, token.child_token()));
        let scanner = Arc::clone(&self.tracker).spawn_scanner(token.child_token());

        *run = Some(RunHandles {
            token,
            worker,
            scanner,
            listener,
            state,
        });
        Ok(())
    }

    /// Stops the current run: cancels everything, joins the worker (after
    /// which no event is emitted), drains delivery, and clears liveness
    /// state. Idempotent — a no-op when nothing is running.
    pub async fn stop(&self) {
        let handles = self.run.lock().await.take();
        let Some(h) = handles else {
            return;
        };

        h.token.cancel();
        let _ = h.worker.await;
        let _ = h.scanner.await;
        let _ = h.listener.await;
        self.tracker.reset();
    }

    /// True while a monitoring run is active.
    pub async fn is_running(&self) -> bool {
        self.run.lock().await.is_some()
    }

    /// Current worker state, or `None` when idle.
    pub async fn worker_state(&self) -> Option<WorkerState> {
        self.run.lock().await.as_ref().map(|h| *h.state.borrow())
    }

    /// The event bus; subscribe here for ad-hoc consumption outside the
    /// subscriber set.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The liveness tracker backing this monitor.
    pub fn tracker(&self) -> &Arc<LivenessTracker> {
        &self.tracker
    }

    /// Forwards bus events to the subscriber set until cancelled, then
    /// drains what the worker already published so nothing emitted before
    /// the join is lost on the delivery path.
    fn spawn_listener(
        &self,
        mut rx: broadcast::Receiver<crate::events::ChannelEvent>,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    ev = rx.recv() => match ev {
                        Ok(ev) => subs.emit(ev),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => return,
                    },
                }
            }
            while let Ok(ev) = rx.try_recv() {
                subs.emit(ev);
            }
        })
    }
}
