//! Trailing-edge debouncer for the search box

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Emits a value once no newer value arrived for `delay`.
///
/// Every [`trigger`](Debouncer::trigger) aborts the pending emission, so only
/// the last value of a burst is delivered.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                tx,
            },
            rx,
        )
    }

    pub fn trigger(&mut self, value: T) {
        self.cancel();
        let deadline = Instant::now() + self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            // receiver gone means the dashboard is shutting down
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending emission, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
