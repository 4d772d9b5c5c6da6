//! # LivenessTracker — detect channels that have stopped producing.
//!
//! Maintains a per-channel **last-seen** map by listening to
//! [`Status::Success`] events, and scans it on a fixed interval for channels
//! silent beyond the configured threshold.
//!
//! ## Behavior
//! - `Success` event → insert-or-update the channel's last-seen instant.
//! - `Waiting`/`Error` events are connection-scoped and never touch the map.
//! - Entries are never removed individually; [`LivenessTracker::reset`]
//!   clears the whole map when monitoring stops, so a restarted session does
//!   not fire alerts for channels from the previous run.
//!
//! ## Internal scheme
//! ```text
//! on_event(ev):
//!   └─ if ev.status == Success => records[channel] = Instant::now()
//!
//! scanner (every scan_interval):
//!   ├─ stale = { c | now - records[c] > stale_after }   (read lock)
//!   └─ for c in stale: notifier.on_stale(alert)         (lock released)
//! ```
//!
//! The map is behind an `RwLock`: `on_event` runs on the tracker's fan-out
//! worker, the scanner on its own timer task, and the two never interleave
//! on a channel's timestamp.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::ChannelEvent;
use crate::liveness::notify::{Notify, StaleAlert};
use crate::subscribers::Subscribe;

/// Tracks per-channel last-seen timestamps and raises stale notifications.
///
/// Timestamps are monotonic ([`Instant`]), consistent within one run.
pub struct LivenessTracker {
    records: RwLock<HashMap<String, Instant>>,
    stale_after: Duration,
    scan_interval: Duration,
    notifiers: Vec<Arc<dyn Notify>>,
    capacity: usize,
}

impl LivenessTracker {
    /// Creates an empty tracker with thresholds from `cfg`.
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            stale_after: cfg.stale_after,
            scan_interval: cfg.scan_interval,
            notifiers: Vec::new(),
            capacity: 2048,
        }
    }

    /// Adds a stale-notification receiver.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Configure the event queue capacity for this subscriber.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Records a message on `channel` at the current instant
    /// (insert-or-update).
    pub fn record(&self, channel: &str) {
        let mut g = self.records.write().unwrap();
        g.insert(channel.to_owned(), Instant::now());
    }

    /// Clears all recorded timestamps.
    ///
    /// Called when monitoring stops; after reset no channel is reported
    /// stale until it has produced at least one message again.
    pub fn reset(&self) {
        self.records.write().unwrap().clear();
    }

    /// Returns the last-seen instant for `channel`, if any.
    #[must_use]
    pub fn last_seen(&self, channel: &str) -> Option<Instant> {
        self.records.read().unwrap().get(channel).copied()
    }

    /// Number of channels currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Returns one alert per channel silent longer than the threshold, as
    /// observed at `now`. Sorted by channel name for deterministic output.
    #[must_use]
    pub fn stale_channels(&self, now: Instant) -> Vec<StaleAlert> {
        let g = self.records.read().unwrap();
        let mut stale: Vec<StaleAlert> = g
            .iter()
            .filter_map(|(channel, last)| {
                let silent_for = now.saturating_duration_since(*last);
                (silent_for > self.stale_after).then(|| StaleAlert {
                    channel: Arc::from(channel.as_str()),
                    silent_for,
                    window: self.stale_after,
                })
            })
            .collect();
        stale.sort_unstable_by(|a, b| a.channel.cmp(&b.channel));
        stale
    }

    /// Runs one scan cycle: computes the stale set, then delivers exactly
    /// one notification per stale channel to every notifier. The map lock is
    /// released before any notifier runs.
    ///
    /// Panics inside a notifier are caught and reported on stderr; they
    /// never take down the scanner or starve the remaining notifiers.
    pub fn scan_once(&self) -> usize {
        let stale = self.stale_channels(Instant::now());
        for alert in &stale {
            for notifier in &self.notifiers {
                let call = std::panic::AssertUnwindSafe(|| notifier.on_stale(alert));
                if let Err(panic_err) = std::panic::catch_unwind(call) {
                    eprintln!("[buswatch] stale notifier panicked: {:?}", panic_err);
                }
            }
        }
        stale.len()
    }

    /// Spawns the periodic scanner.
    ///
    /// Ticks every `scan_interval`, starting one interval after the call
    /// (a fresh session must not alert before the first window has passed).
    /// The task exits when `token` is cancelled.
    pub fn spawn_scanner(self: Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        let tracker = self;
        let interval = tracker.scan_interval;
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tracker.scan_once();
                    }
                    _ = token.cancelled() => break,
                }
            }
        })
    }
}

#[async_trait]
impl Subscribe for LivenessTracker {
    async fn on_event(&self, ev: &ChannelEvent) {
        if ev.is_message() {
            self.record(&ev.channel);
        }
    }

    fn name(&self) -> &'static str {
        "liveness"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}
