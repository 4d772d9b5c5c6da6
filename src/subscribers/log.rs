//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [message] channel=alerts payload="cpu high"
//! [waiting] reason="connection refused"
//! [error] reason="invalid bus address ''"
//! ```

use async_trait::async_trait;

use crate::events::{ChannelEvent, Status};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Useful for development and demos. Not intended as a display layer —
/// implement a custom [`Subscribe`] for structured output.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, ev: &ChannelEvent) {
        match ev.status {
            Status::Success => {
                println!("[message] channel={} payload={:?}", ev.channel, ev.payload);
            }
            Status::Waiting => {
                println!("[waiting] reason={:?}", ev.reason.as_deref().unwrap_or(""));
            }
            Status::Error => {
                println!("[error] reason={:?}", ev.reason.as_deref().unwrap_or(""));
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
