//! Channel events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to hand
//! events from the connection worker to its consumers (subscriber fan-out,
//! liveness tracker, tests).
//!
//! ## Contents
//! - [`Status`], [`ChannelEvent`] — event classification and payload
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: `ConnectionWorker` (one per monitoring run).
//! - **Consumers**: `Monitor`'s bus listener (fans out to `SubscriberSet`,
//!   which includes the `LivenessTracker`).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{ChannelEvent, Status};
