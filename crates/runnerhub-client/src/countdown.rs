//! Lease expiry countdown.
//!
//! Derives remaining time locally on a fixed tick without server round
//! trips, and fires a one-shot expired signal so the owning view can
//! re-fetch authoritative state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use runnerhub_core::clock::Clock;

/// Seconds remaining until a lease expires, saturating at zero.
pub fn remaining_seconds(started_at: DateTime<Utc>, duration_secs: u64, now: DateTime<Utc>) -> u64 {
    let expires_at = started_at + chrono::Duration::seconds(duration_secs as i64);
    (expires_at - now).num_seconds().max(0) as u64
}

/// The lease parameters a countdown is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownInputs {
    /// When the lease began.
    pub started_at: DateTime<Utc>,
    /// Lease length in seconds.
    pub duration_secs: u64,
}

/// A restartable, cancelable countdown over a lease.
///
/// Publishes remaining seconds on a `watch` channel every tick and fires a
/// one-shot expired signal when the remaining time reaches zero, then
/// stops ticking. Dropping the handle aborts the timer task, so no expiry
/// callback can fire against an unmounted view.
#[derive(Debug)]
pub struct Countdown {
    clock: Arc<dyn Clock>,
    tick: Duration,
    remaining_rx: watch::Receiver<u64>,
    expired_rx: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Starts a countdown over the given lease parameters.
    pub fn start(inputs: CountdownInputs, tick: Duration, clock: Arc<dyn Clock>) -> Self {
        let initial = remaining_seconds(inputs.started_at, inputs.duration_secs, clock.now());
        let (remaining_tx, remaining_rx) = watch::channel(initial);
        let (expired_tx, expired_rx) = watch::channel(false);

        let task = tokio::spawn(run_countdown(
            inputs,
            tick,
            Arc::clone(&clock),
            remaining_tx,
            expired_tx,
        ));

        Self {
            clock,
            tick,
            remaining_rx,
            expired_rx,
            task,
        }
    }

    /// The most recently published remaining seconds.
    pub fn remaining(&self) -> u64 {
        *self.remaining_rx.borrow()
    }

    /// Whether the expired signal has fired.
    pub fn is_expired(&self) -> bool {
        *self.expired_rx.borrow()
    }

    /// A receiver of remaining-seconds updates.
    pub fn subscribe_remaining(&self) -> watch::Receiver<u64> {
        self.remaining_rx.clone()
    }

    /// A receiver of the one-shot expired signal.
    pub fn subscribe_expired(&self) -> watch::Receiver<bool> {
        self.expired_rx.clone()
    }

    /// Restarts the countdown with new lease parameters.
    ///
    /// The previous timer task is aborted; the countdown never continues
    /// from stale inputs.
    pub fn restart(&mut self, inputs: CountdownInputs) {
        self.task.abort();
        *self = Self::start(inputs, self.tick, Arc::clone(&self.clock));
    }

    /// Stops the countdown without waiting for expiry.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_countdown(
    inputs: CountdownInputs,
    tick: Duration,
    clock: Arc<dyn Clock>,
    remaining_tx: watch::Sender<u64>,
    expired_tx: watch::Sender<bool>,
) {
    let mut interval = time::interval(tick);
    // The first tick of a Tokio interval completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let remaining = remaining_seconds(inputs.started_at, inputs.duration_secs, clock.now());
        if remaining_tx.send(remaining).is_err() {
            break;
        }

        if remaining == 0 {
            debug!("Lease countdown reached zero, firing expired signal");
            let _ = expired_tx.send(true);
            break;
        }
    }
}
