//! # Demo: stale_alerts
//!
//! Reports channels that go quiet, using short thresholds so the behavior
//! is visible without waiting a minute.
//!
//! Shows how to:
//! - Implement [`Notify`] for stale-channel notifications.
//! - Implement a custom [`Subscribe`] for connection status display.
//! - Tune `stale_after` / `scan_interval` via [`Config`].
//!
//! ## Run
//! Requires a Redis-compatible server on localhost:6379. Publish something
//! (`redis-cli publish alerts "cpu high"`), then let the channel sit idle.
//! ```bash
//! cargo run --example stale_alerts
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buswatch::{
    ChannelEvent, Config, LivenessTracker, Monitor, Notify, StaleAlert, Status, Subscribe,
    SubscriptionTarget,
};

/// Prints connection status transitions, ignoring per-message traffic.
struct StatusLine;

#[async_trait]
impl Subscribe for StatusLine {
    async fn on_event(&self, ev: &ChannelEvent) {
        match ev.status {
            Status::Success => println!("<- {} ({} bytes)", ev.channel, ev.payload.len()),
            Status::Waiting => println!("!! reconnecting: {}", ev.reason.as_deref().unwrap_or("")),
            Status::Error => println!("!! bad target: {}", ev.reason.as_deref().unwrap_or("")),
        }
    }

    fn name(&self) -> &'static str {
        "status-line"
    }
}

struct PrintAlerts;

impl Notify for PrintAlerts {
    fn on_stale(&self, alert: &StaleAlert) {
        println!("** {alert}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config {
        stale_after: Duration::from_secs(10),
        scan_interval: Duration::from_secs(5),
        ..Config::default()
    };

    let tracker =
        Arc::new(LivenessTracker::new(&cfg).with_notifier(Arc::new(PrintAlerts)));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(StatusLine)];
    let monitor = Monitor::new(cfg, subs, tracker);

    monitor.start(SubscriptionTarget::default()).await?;
    println!("watching; channels silent for >10s are reported every 5s (Ctrl-C to stop)");

    tokio::signal::ctrl_c().await?;
    monitor.stop().await;
    Ok(())
}
