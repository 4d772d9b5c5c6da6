//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the non-blocking
//! [`SubscriberSet`] fan-out, plus the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   ConnectionWorker ── publish(ChannelEvent) ──► Bus
//!                                                  │
//!                                       monitor listener
//!                                                  │
//!                                        SubscriberSet::emit
//!                                     ┌────────┬───┴──────┐
//!                                     ▼        ▼          ▼
//!                               LivenessTracker LogWriter custom UI
//! ```
//!
//! ## Subscriber types
//! - **Passive** — observe and react (logging, display, export).
//! - **Stateful** — maintain state from events
//!   ([`LivenessTracker`](crate::LivenessTracker)).

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
