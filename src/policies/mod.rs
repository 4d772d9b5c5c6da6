//! Reconnect timing policies.
//!
//! This module groups the knobs that control **how long** the worker waits
//! between failed connection attempts. There is no restart *decision* to
//! make — transient failures always retry, configuration errors never do —
//! so the policy surface is timing only.
//!
//! ## Contents
//! - [`BackoffPolicy`] — how delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`] — randomization strategy
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=2.0, max=5s, no jitter.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
