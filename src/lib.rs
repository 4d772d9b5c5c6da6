//! # buswatch
//!
//! **buswatch** monitors a Redis-style publish/subscribe bus: it keeps a
//! live pattern subscription with automatic reconnection, streams one event
//! per received message, and tracks per-channel liveness so silent channels
//! get reported.
//!
//! The crate is a building block for monitoring UIs and exporters: it owns
//! the connection, the retry loop, and the liveness state; presentation is
//! whatever you plug in as a subscriber.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            ┌────────────────────┐
//!            │ SubscriptionTarget │  (bus address + channel pattern)
//!            └─────────┬──────────┘
//!                      ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Monitor (lifecycle orchestrator)                         │
//! │  - Bus (broadcast events)                                 │
//! │  - SubscriberSet (fans out to user subscribers)           │
//! │  - LivenessTracker (per-channel last-seen + stale scan)   │
//! └────────┬──────────────────────────────────────────────────┘
//!          ▼
//!   ┌───────────────────┐     Publishes ChannelEvents:
//!   │ ConnectionWorker  │     - Success (one per message)
//!   │ (reconnect loop)  │     - Waiting (one per failed attempt)
//!   └────────┬──────────┘     - Error   (malformed target, terminal)
//!            ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast channel)                 │
//! └───────────────────────────┬───────────────────────────────┘
//!                             ▼
//!                     monitor listener
//!                   ┌─────────┼─────────┐
//!                   ▼         ▼         ▼
//!            LivenessTracker LogWriter custom subscribers
//!                   │
//!             stale scanner ──► Notify::on_stale
//!                              ("No data received for channel ...")
//! ```
//!
//! ### Worker lifecycle
//! ```text
//! Idle ──► Connecting ──► Subscribed ──► Receiving
//!             ▲                             │
//!             │                        I/O failure
//!        retry delay                        ▼
//!             └──────────────────── WaitingRetry
//!
//! stop() from any state ──► Stopped (terminal; no events afterwards)
//! ```
//!
//! ## Guarantees
//! - Exactly one `Success` event per received message; per-channel order
//!   follows bus delivery order.
//! - Exactly one `Waiting` event per failed connection attempt; retries
//!   continue forever with bounded exponential backoff.
//! - Undecodable messages are skipped silently; the worker never crashes on
//!   bus data.
//! - `stop()` joins the worker before returning: no event is emitted after
//!   it returns, and a subsequent `start()` cannot observe the old run.
//! - One stale notification per silent channel per scan cycle, repeated
//!   until the channel speaks again or monitoring stops.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use buswatch::{
//!     Config, LivenessTracker, LogWriter, Monitor, Notify, StaleAlert,
//!     Subscribe, SubscriptionTarget,
//! };
//!
//! struct PrintAlerts;
//!
//! impl Notify for PrintAlerts {
//!     fn on_stale(&self, alert: &StaleAlert) {
//!         eprintln!("{alert}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let tracker = Arc::new(
//!         LivenessTracker::new(&cfg).with_notifier(Arc::new(PrintAlerts)),
//!     );
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//!     let monitor = Monitor::new(cfg, subs, tracker);
//!
//!     monitor.start(SubscriptionTarget::new("redis://localhost:6379", "*")).await?;
//!     tokio::signal::ctrl_c().await?;
//!     monitor.stop().await;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod liveness;
mod monitor;
mod policies;
mod subscribers;
mod worker;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{MonitorError, RuntimeError};
pub use events::{Bus, ChannelEvent, Status};
pub use liveness::{LivenessTracker, Notify, StaleAlert};
pub use monitor::Monitor;
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use worker::{ConnectionWorker, SubscriptionTarget, WorkerState};
