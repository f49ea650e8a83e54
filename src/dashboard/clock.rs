//! Wall clock widget, ticking independently of weather state

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

pub const TICK: Duration = Duration::from_secs(1);

/// Format as "03:04:05 PM"
#[must_use]
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%I:%M:%S %p").to_string()
}

/// Publishes the local time once per tick until dropped
pub struct Clock {
    handle: JoinHandle<()>,
}

impl Clock {
    pub fn start(tick: Duration) -> (Self, watch::Receiver<DateTime<Local>>) {
        let (tx, rx) = watch::channel(Local::now());
        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(Local::now()).is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
