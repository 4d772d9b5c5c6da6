//! Error types used by the monitor runtime and the connection worker.
//!
//! This module defines two enums:
//!
//! - [`RuntimeError`] — lifecycle misuse surfaced to the caller.
//! - [`MonitorError`] — failures inside the worker's connect/subscribe/receive
//!   path. These never cross the API boundary as `Err`: retryable ones become
//!   `Waiting` events, the configuration error becomes a single `Error` event.
//!
//! Both types provide `as_label` for logs; [`MonitorError::is_retryable`]
//! drives the worker's retry decision.

use std::time::Duration;
use thiserror::Error;

/// # Errors surfaced by the monitor lifecycle API.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// `start` was called while a monitoring run is active. Stop the current
    /// run first; silently replacing it could let the old worker race the
    /// new one.
    #[error("monitor is already running; call stop() before start()")]
    AlreadyRunning,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::AlreadyRunning => "runtime_already_running",
        }
    }
}

/// # Failures on the worker's connection path.
///
/// All variants except [`MonitorError::InvalidAddress`] are transient and
/// recovered locally by the worker's retry loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The bus address is empty or not a parseable URL (configuration
    /// error; never retried).
    #[error("invalid bus address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Opening the connection failed (refused, reset, DNS, auth).
    #[error("connection failed: {reason}")]
    Connect { reason: String },

    /// Opening the connection did not complete within the configured
    /// timeout.
    #[error("connect timed out after {timeout:?}")]
    ConnectTimeout { timeout: Duration },

    /// The pattern subscription could not be established.
    #[error("subscribe failed: {reason}")]
    Subscribe { reason: String },

    /// The message stream ended: the bus closed the connection or the link
    /// dropped mid-receive.
    #[error("connection to the bus was lost")]
    ConnectionLost,
}

impl MonitorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use buswatch::MonitorError;
    ///
    /// let err = MonitorError::ConnectionLost;
    /// assert_eq!(err.as_label(), "connection_lost");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MonitorError::InvalidAddress { .. } => "invalid_address",
            MonitorError::Connect { .. } => "connect_failed",
            MonitorError::ConnectTimeout { .. } => "connect_timeout",
            MonitorError::Subscribe { .. } => "subscribe_failed",
            MonitorError::ConnectionLost => "connection_lost",
        }
    }

    /// Indicates whether the worker should retry after this error.
    ///
    /// `false` only for [`MonitorError::InvalidAddress`]: retrying cannot fix
    /// a malformed target, so the worker emits one `Error` event and exits.
    ///
    /// # Example
    /// ```
    /// use buswatch::MonitorError;
    ///
    /// assert!(MonitorError::ConnectionLost.is_retryable());
    ///
    /// let bad = MonitorError::InvalidAddress {
    ///     address: "".into(),
    ///     reason: "empty".into(),
    /// };
    /// assert!(!bad.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        !matches!(self, MonitorError::InvalidAddress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_address_is_terminal() {
        let transient = [
            MonitorError::Connect {
                reason: "refused".into(),
            },
            MonitorError::ConnectTimeout {
                timeout: Duration::from_secs(5),
            },
            MonitorError::Subscribe {
                reason: "reset".into(),
            },
            MonitorError::ConnectionLost,
        ];
        for err in transient {
            assert!(err.is_retryable(), "{} must retry", err.as_label());
        }

        let config = MonitorError::InvalidAddress {
            address: "".into(),
            reason: "empty address".into(),
        };
        assert!(!config.is_retryable());
    }
}
