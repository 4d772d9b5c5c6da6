//! # Connection worker: the bus-facing half of the monitor.
//!
//! ## Contents
//! - [`SubscriptionTarget`] — address + pattern for one run
//! - [`ConnectionWorker`] — connect/subscribe/receive loop with reconnection
//! - [`WorkerState`] — observable state machine
//!
//! The worker publishes to the [`Bus`](crate::Bus) and owns the connection
//! handle exclusively; everything downstream consumes events only.

mod target;
mod worker;

pub use target::SubscriptionTarget;
pub use worker::{ConnectionWorker, WorkerState};
