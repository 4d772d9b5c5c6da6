//! # Global monitor configuration.
//!
//! Provides [`Config`] — centralized settings for the monitor runtime.
//! All defaulting happens in one place (the `Default` impl); there are no
//! lazily-created fields anywhere in the crate.
//!
//! Config is used in two ways:
//! 1. **Monitor creation**: `Monitor::new(config, subscribers, tracker)`
//! 2. **Standalone worker**: `ConnectionWorker::new(bus, &config)`

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Global configuration for the monitor runtime.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
/// - `connect_timeout`: upper bound on one connect attempt
/// - `backoff`: reconnect delay policy (bounded, resets after a successful
///   subscribe)
/// - `stale_after`: a channel silent longer than this is stale
/// - `scan_interval`: how often the liveness scanner runs
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip the oldest items.
    pub bus_capacity: usize,

    /// Maximum time one connect attempt may take before it counts as a
    /// transient failure.
    pub connect_timeout: Duration,

    /// Delay policy between failed connection attempts.
    pub backoff: BackoffPolicy,

    /// Silence threshold: a channel with no message for longer than this is
    /// reported stale on every scan until it speaks again.
    pub stale_after: Duration,

    /// Interval between liveness scans.
    pub scan_interval: Duration,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `connect_timeout = 5s`
    /// - `backoff = BackoffPolicy::default()` (100ms ×2 capped at 5s)
    /// - `stale_after = 60s`
    /// - `scan_interval = 60s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            connect_timeout: Duration::from_secs(5),
            backoff: BackoffPolicy::default(),
            stale_after: Duration::from_secs(60),
            scan_interval: Duration::from_secs(60),
        }
    }
}
