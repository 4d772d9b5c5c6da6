//! # Backoff policy for reconnect attempts.
//!
//! [`BackoffPolicy`] controls how the delay between failed connection
//! attempts grows. The delay for attempt `n` (0-indexed) is
//! `first × factor^n`, clamped to `max`, with jitter applied last. The base
//! delay is derived purely from the attempt number, so jitter output never
//! feeds back into later calculations.
//!
//! The worker resets its attempt counter after every successful subscribe,
//! so a flapping bus always starts again from `first`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use buswatch::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(5),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms → capped at 5s
//! assert_eq!(backoff.next(10), Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Reconnect backoff policy.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy applied to the clamped base delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns the reconnect default: `first = 100ms`, `factor = 2.0`,
    /// `max = 5s`, no jitter. Bounded growth keeps the retry loop from
    /// hammering an unreachable bus while staying responsive once it is
    /// back.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(5),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given attempt number (0-indexed).
    ///
    /// The base is `first × factor^attempt` clamped to `max`; jitter is
    /// applied to the clamped base and is never fed back into subsequent
    /// calculations.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !unclamped.is_finite() || unclamped < 0.0 || unclamped > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(unclamped)
        };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(first_ms: u64, max: Duration, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max,
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_attempt_zero_returns_first() {
        let p = policy(100, Duration::from_secs(5), 2.0);
        assert_eq!(p.next(0), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_growth() {
        let p = policy(100, Duration::from_secs(30), 2.0);
        assert_eq!(p.next(1), Duration::from_millis(200));
        assert_eq!(p.next(2), Duration::from_millis(400));
        assert_eq!(p.next(3), Duration::from_millis(800));
    }

    #[test]
    fn test_clamped_to_max() {
        let p = policy(100, Duration::from_secs(5), 2.0);
        assert_eq!(p.next(10), Duration::from_secs(5));
        assert_eq!(p.next(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_first_exceeds_max() {
        let p = policy(10_000, Duration::from_secs(5), 2.0);
        assert_eq!(p.next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_constant_factor() {
        let p = policy(500, Duration::from_secs(5), 1.0);
        for attempt in 0..8 {
            assert_eq!(p.next(attempt), Duration::from_millis(500));
        }
    }

    #[test]
    fn test_full_jitter_never_exceeds_base() {
        let p = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(5),
            factor: 2.0,
            jitter: JitterPolicy::Full,
        };
        for attempt in 0..12 {
            let base_ms = (100.0 * 2.0f64.powi(attempt as i32)).min(5_000.0);
            assert!(p.next(attempt) <= Duration::from_millis(base_ms as u64));
        }
    }
}
