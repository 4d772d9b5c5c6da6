//! # Demo: watch
//!
//! Streams every channel on a local bus to stdout.
//!
//! Shows how to:
//! - Build a [`Monitor`] with the built-in [`LogWriter`] subscriber.
//! - Start a pattern subscription and stop it cleanly on Ctrl-C.
//!
//! ## Run
//! Requires a Redis-compatible server on localhost:6379.
//! ```bash
//! cargo run --example watch
//! ```

use std::sync::Arc;

use buswatch::{Config, LivenessTracker, LogWriter, Monitor, Subscribe, SubscriptionTarget};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::default();
    let tracker = Arc::new(LivenessTracker::new(&cfg));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let monitor = Monitor::new(cfg, subs, tracker);

    monitor.start(SubscriptionTarget::default()).await?;
    println!("watching all channels on redis://localhost:6379 (Ctrl-C to stop)");

    tokio::signal::ctrl_c().await?;
    monitor.stop().await;
    println!("stopped");
    Ok(())
}
