//! # Subscription target: which bus, which channels.
//!
//! [`SubscriptionTarget`] pairs a URL-style bus address with a glob-style
//! channel pattern. It is immutable for the lifetime of one worker run; to
//! change either value, stop the monitor and start it again.
//!
//! The pattern is passed through unmodified to the bus's pattern-subscribe
//! primitive: `*` matches all channels, an empty pattern matches nothing
//! (both legal). An empty *address* is a configuration error, surfaced as a
//! single `Error` event at start.

use crate::error::MonitorError;

/// Address + pattern for one monitoring run.
///
/// # Example
/// ```rust
/// use buswatch::SubscriptionTarget;
///
/// let target = SubscriptionTarget::new("redis://localhost:6379", "jobs:*");
/// assert_eq!(target.bus_address(), "redis://localhost:6379");
/// assert_eq!(target.channel_pattern(), "jobs:*");
///
/// // Default placeholder values, matching every channel on a local bus:
/// let target = SubscriptionTarget::default();
/// assert_eq!(target.channel_pattern(), "*");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionTarget {
    bus_address: String,
    channel_pattern: String,
}

impl SubscriptionTarget {
    /// Creates a target from an address and a channel pattern.
    ///
    /// No validation happens here; a malformed address is reported by the
    /// worker as an `Error` event so that the caller's event-consumption
    /// path is the single place failures are observed.
    pub fn new(bus_address: impl Into<String>, channel_pattern: impl Into<String>) -> Self {
        Self {
            bus_address: bus_address.into(),
            channel_pattern: channel_pattern.into(),
        }
    }

    /// URL-style bus address (`scheme://host:port`).
    pub fn bus_address(&self) -> &str {
        &self.bus_address
    }

    /// Glob-style channel pattern, passed verbatim to the bus.
    pub fn channel_pattern(&self) -> &str {
        &self.channel_pattern
    }

    /// Rejects an empty address before the worker attempts a connection.
    pub(crate) fn validate(&self) -> Result<(), MonitorError> {
        if self.bus_address.is_empty() {
            return Err(MonitorError::InvalidAddress {
                address: String::new(),
                reason: "bus address must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for SubscriptionTarget {
    /// Local bus, all channels: `redis://localhost:6379` / `*`.
    fn default() -> Self {
        Self::new("redis://localhost:6379", "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_address_is_rejected() {
        let target = SubscriptionTarget::new("", "*");
        let err = target.validate().unwrap_err();
        assert_eq!(err.as_label(), "invalid_address");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_pattern_is_allowed() {
        // Empty pattern means "match nothing" per the bus's glob semantics.
        let target = SubscriptionTarget::new("redis://localhost:6379", "");
        assert!(target.validate().is_ok());
    }
}
