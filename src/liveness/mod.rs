//! # Liveness tracking and stale-channel detection.
//!
//! ## Contents
//! - [`LivenessTracker`] — per-channel last-seen map + periodic scanner
//! - [`Notify`], [`StaleAlert`] — the notification surface
//!
//! ## Quick wiring
//! ```text
//! Bus ──► monitor listener ──► SubscriberSet ──► LivenessTracker.on_event()
//!                                                      │ (Success only)
//!                                                records[channel] = now
//!
//! scanner task (every scan_interval):
//!   stale_channels(now) ──► Notify::on_stale(StaleAlert)   (one per channel
//!                                                           per cycle)
//! ```

mod notify;
mod tracker;

pub use notify::{Notify, StaleAlert};
pub use tracker::LivenessTracker;
