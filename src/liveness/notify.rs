//! # Stale-channel notification surface.
//!
//! The liveness scanner reports silence through the [`Notify`] trait: one
//! call per qualifying channel per scan cycle. [`StaleAlert`] carries the
//! channel name, how long it has been silent, and the configured window, and
//! renders the canonical message string for presentation layers that just
//! want text.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One stale-channel notification.
#[derive(Debug, Clone)]
pub struct StaleAlert {
    /// Channel that has gone quiet.
    pub channel: Arc<str>,
    /// Time since the channel's last message.
    pub silent_for: Duration,
    /// The configured staleness window (`Config::stale_after`).
    pub window: Duration,
}

impl fmt::Display for StaleAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No data received for channel '{}' in the last {:?}.",
            self.channel, self.window
        )
    }
}

/// Receiver of stale-channel notifications.
///
/// Called from the scanner task once per qualifying channel per scan cycle.
/// Notifications are not deduplicated across cycles: a channel that stays
/// silent is reported again on every scan until it produces a message or
/// monitoring stops. Implementations must be cheap or hand off to their own
/// queue; the record map lock is **not** held during the call, but the
/// scanner processes notifiers sequentially.
pub trait Notify: Send + Sync + 'static {
    /// Handle one stale-channel notification.
    fn on_stale(&self, alert: &StaleAlert);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_message_wording() {
        let alert = StaleAlert {
            channel: "alerts".into(),
            silent_for: Duration::from_secs(183),
            window: Duration::from_secs(60),
        };
        assert_eq!(
            alert.to_string(),
            "No data received for channel 'alerts' in the last 60s."
        );
    }
}
