//! # ConnectionWorker: pattern subscription with automatic reconnection.
//!
//! Owns the bus connection for one monitoring run and surfaces a single
//! linear stream of [`ChannelEvent`]s:
//! - one `Success` per received message (channel + payload decoded as UTF-8),
//! - one `Waiting` per failed connect/subscribe/receive attempt,
//! - one terminal `Error` if the target itself is malformed.
//!
//! ## Loop
//! ```text
//! run(target, token):
//!   validate(target) ── bad ──► publish Error ──► Stopped
//!   loop {
//!     ├─► Connecting: open connection (bounded by connect_timeout)
//!     ├─► Subscribed: PSUBSCRIBE pattern        (resets backoff counter)
//!     ├─► Receiving:  select! { message ─► publish Success
//!     │                         stream end ─► fall through to retry
//!     │                         token     ─► Stopped }
//!     └─► on any transient failure:
//!          ├─► publish Waiting
//!          ├─► WaitingRetry: sleep(backoff.next(attempt))  (cancellable)
//!          └─► continue
//!   }
//! ```
//!
//! ## Rules
//! - Undecodable (non-UTF-8) channel or payload: skip the message, publish
//!   nothing, keep receiving.
//! - Cancellation is honored at every suspension point (connect, subscribe,
//!   receive, backoff sleep), so `stop()` unblocks the worker promptly.
//! - After `run` returns, no further events are published — the monitor
//!   joins the task before reporting the run stopped.
//! - Per-channel event order follows bus delivery order; nothing is
//!   guaranteed across channels.

use std::time::Duration;

use futures::StreamExt;
use redis::Msg;
use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::MonitorError;
use crate::events::{Bus, ChannelEvent};
use crate::policies::BackoffPolicy;
use crate::worker::target::SubscriptionTarget;

/// Connection state machine, observable through [`ConnectionWorker::state_watch`].
///
/// `Idle` is initial; `Stopped` is terminal and reached only by cancellation
/// or a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Before `run` begins work.
    Idle,
    /// Opening a connection to the bus.
    Connecting,
    /// Connection open, pattern subscription established.
    Subscribed,
    /// Blocking on the message stream.
    Receiving,
    /// A transient failure occurred; sleeping before the next attempt.
    WaitingRetry,
    /// The run has ended. No further events will be published.
    Stopped,
}

impl WorkerState {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerState::Idle => "idle",
            WorkerState::Connecting => "connecting",
            WorkerState::Subscribed => "subscribed",
            WorkerState::Receiving => "receiving",
            WorkerState::WaitingRetry => "waiting_retry",
            WorkerState::Stopped => "stopped",
        }
    }
}

/// Maintains a live pattern subscription and publishes channel events.
///
/// The worker exclusively owns its connection handle; consumers only ever
/// see events. Transient failures retry forever with bounded backoff; the
/// worst case is an indefinite `WaitingRetry`/`Connecting` cycle, visible
/// through `Waiting` events.
pub struct ConnectionWorker {
    bus: Bus,
    backoff: BackoffPolicy,
    connect_timeout: Duration,
    state: watch::Sender<WorkerState>,
}

impl ConnectionWorker {
    /// Creates a worker publishing to `bus`, with timing taken from `cfg`.
    pub fn new(bus: Bus, cfg: &Config) -> Self {
        let (state, _) = watch::channel(WorkerState::Idle);
        Self {
            bus,
            backoff: cfg.backoff,
            connect_timeout: cfg.connect_timeout,
            state,
        }
    }

    /// Returns a receiver observing state transitions.
    ///
    /// Take this before handing the worker to [`run`](Self::run).
    pub fn state_watch(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    /// Runs the subscription loop until `token` is cancelled or the target
    /// turns out to be malformed.
    ///
    /// Never returns an error and never panics on I/O: configuration
    /// problems become a single `Error` event, transient problems become
    /// `Waiting` events followed by a retry.
    pub async fn run(self, target: SubscriptionTarget, token: CancellationToken) {
        if let Err(e) = target.validate() {
            self.bus.publish(ChannelEvent::config_error(e.to_string()));
            self.set_state(WorkerState::Stopped);
            return;
        }

        let mut attempt: u32 = 0;
        loop {
            if token.is_cancelled() {
                break;
            }
            self.set_state(WorkerState::Connecting);

            match self.connect_and_receive(&target, &token, &mut attempt).await {
                // Cancelled mid-connect or mid-receive: clean exit, not a failure.
                Ok(()) => break,
                Err(e) if !e.is_retryable() => {
                    self.bus.publish(ChannelEvent::config_error(e.to_string()));
                    break;
                }
                Err(e) => {
                    // A failure observed after cancellation is a shutdown
                    // race, not a retry cycle: exit without a Waiting marker.
                    if token.is_cancelled() {
                        break;
                    }
                    self.bus
                        .publish(ChannelEvent::waiting().with_reason(e.to_string()));
                    self.set_state(WorkerState::WaitingRetry);

                    let delay = self.backoff.next(attempt);
                    attempt = attempt.saturating_add(1);
                    tokio::select! {
                        _ = time::sleep(delay) => {}
                        _ = token.cancelled() => break,
                    }
                }
            }
        }
        self.set_state(WorkerState::Stopped);
    }

    /// One connection attempt: open, subscribe, then receive until the
    /// stream ends or the token fires.
    ///
    /// `Ok(())` means cancellation (graceful); every failure is an `Err` so
    /// the caller decides between retry and terminal error.
    async fn connect_and_receive(
        &self,
        target: &SubscriptionTarget,
        token: &CancellationToken,
        attempt: &mut u32,
    ) -> Result<(), MonitorError> {
        let client = redis::Client::open(target.bus_address()).map_err(|e| {
            MonitorError::InvalidAddress {
                address: target.bus_address().to_owned(),
                reason: e.to_string(),
            }
        })?;

        let mut pubsub = tokio::select! {
            res = time::timeout(self.connect_timeout, client.get_async_pubsub()) => match res {
                Ok(Ok(pubsub)) => pubsub,
                Ok(Err(e)) => {
                    return Err(MonitorError::Connect {
                        reason: e.to_string(),
                    })
                }
                Err(_elapsed) => {
                    return Err(MonitorError::ConnectTimeout {
                        timeout: self.connect_timeout,
                    })
                }
            },
            _ = token.cancelled() => return Ok(()),
        };

        tokio::select! {
            res = pubsub.psubscribe(target.channel_pattern()) => {
                res.map_err(|e| MonitorError::Subscribe {
                    reason: e.to_string(),
                })?;
            }
            _ = token.cancelled() => return Ok(()),
        }

        // Subscription established: the next failure starts backoff from zero.
        *attempt = 0;
        self.set_state(WorkerState::Subscribed);

        let mut stream = pubsub.on_message();
        self.set_state(WorkerState::Receiving);
        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                msg = stream.next() => match msg {
                    Some(msg) => self.emit_message(&msg),
                    None => return Err(MonitorError::ConnectionLost),
                },
            }
        }
    }

    /// Decodes one message and publishes a `Success` event.
    ///
    /// Non-UTF-8 channel names or payloads are skipped without an event.
    fn emit_message(&self, msg: &Msg) {
        let Ok(channel) = msg.get_channel::<String>() else {
            return;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            return;
        };
        self.bus.publish(ChannelEvent::message(channel, payload));
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Status;

    fn fast_config() -> Config {
        Config {
            backoff: BackoffPolicy {
                first: Duration::from_millis(10),
                max: Duration::from_millis(20),
                factor: 2.0,
                ..BackoffPolicy::default()
            },
            connect_timeout: Duration::from_millis(500),
            ..Config::default()
        }
    }

    /// Builds a pattern-subscription message frame the way the wire
    /// protocol delivers it, with raw (possibly non-UTF-8) bytes.
    fn pmessage(channel: Vec<u8>, payload: Vec<u8>) -> Msg {
        let frame = redis::Value::Array(vec![
            redis::Value::BulkString(b"pmessage".to_vec()),
            redis::Value::BulkString(b"*".to_vec()),
            redis::Value::BulkString(channel),
            redis::Value::BulkString(payload),
        ]);
        Msg::from_value(&frame).unwrap()
    }

    #[tokio::test]
    async fn test_undecodable_messages_are_skipped_without_an_event() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());

        // 0xFF is never valid UTF-8; 0xC3 0x28 is a truncated sequence.
        worker.emit_message(&pmessage(vec![0xff, 0xfe], b"payload".to_vec()));
        worker.emit_message(&pmessage(b"alerts".to_vec(), vec![0xc3, 0x28]));
        assert!(rx.try_recv().is_err());

        // A decodable message right after still goes through untouched.
        worker.emit_message(&pmessage(b"alerts".to_vec(), b"cpu high".to_vec()));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.status, Status::Success);
        assert_eq!(ev.channel.as_ref(), "alerts");
        assert_eq!(ev.payload.as_ref(), "cpu high");
    }

    #[tokio::test]
    async fn test_malformed_address_emits_single_error_and_exits() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());
        let mut state = worker.state_watch();

        let target = SubscriptionTarget::new("definitely not a url", "*");
        worker.run(target, CancellationToken::new()).await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.status, Status::Error);
        assert!(ev.reason.is_some());
        // Terminal: nothing after the single error event.
        assert!(rx.try_recv().is_err());
        assert_eq!(*state.borrow_and_update(), WorkerState::Stopped);
    }

    #[tokio::test]
    async fn test_empty_address_is_a_config_error() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());

        worker
            .run(SubscriptionTarget::new("", "*"), CancellationToken::new())
            .await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.status, Status::Error);
    }

    #[tokio::test]
    async fn test_unreachable_bus_keeps_retrying_with_waiting_events() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());
        let token = CancellationToken::new();

        // Port 1 on loopback: connection refused, quickly and repeatably.
        let target = SubscriptionTarget::new("redis://127.0.0.1:1", "*");
        let handle = tokio::spawn(worker.run(target, token.clone()));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.status, Status::Waiting);
        assert!(first.channel.is_empty());
        assert!(first.payload.is_empty());

        let second = rx.recv().await.unwrap();
        assert_eq!(second.status, Status::Waiting);
        assert!(second.seq > first.seq);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_token_suppresses_all_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());
        let mut state = worker.state_watch();

        let token = CancellationToken::new();
        token.cancel();
        worker
            .run(SubscriptionTarget::new("redis://127.0.0.1:1", "*"), token)
            .await;

        // Stop racing the run: not even a Waiting event may surface.
        assert!(rx.try_recv().is_err());
        assert_eq!(*state.borrow_and_update(), WorkerState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_during_long_backoff_is_prompt_and_silent() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let cfg = Config {
            backoff: BackoffPolicy {
                first: Duration::from_secs(30),
                max: Duration::from_secs(30),
                ..BackoffPolicy::default()
            },
            connect_timeout: Duration::from_millis(500),
            ..Config::default()
        };
        let worker = ConnectionWorker::new(bus, &cfg);
        let token = CancellationToken::new();

        let target = SubscriptionTarget::new("redis://127.0.0.1:1", "*");
        let handle = tokio::spawn(worker.run(target, token.clone()));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.status, Status::Waiting);

        // The worker is now deep in a 30s backoff sleep; cancellation must
        // not wait it out, and nothing may follow the last Waiting event.
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("stop must interrupt the backoff sleep")
            .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_during_retry_emits_nothing_further() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let worker = ConnectionWorker::new(bus, &fast_config());
        let mut state = worker.state_watch();
        let token = CancellationToken::new();

        let target = SubscriptionTarget::new("redis://127.0.0.1:1", "*");
        let handle = tokio::spawn(worker.run(target, token.clone()));

        // Wait for the first failed attempt, then stop.
        let _ = rx.recv().await.unwrap();
        token.cancel();
        handle.await.unwrap();
        assert_eq!(*state.borrow_and_update(), WorkerState::Stopped);

        // Drain whatever was published before the join; afterwards the
        // stream must stay empty.
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
