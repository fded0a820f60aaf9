//! Wall-clock source, independent of the working timer

use std::time::Duration;

use chrono::{DateTime, Local};
use futures::stream::{self, Stream};
use tokio::time::{interval, MissedTickBehavior};

/// Produces wall-clock readings on a fixed cadence
#[derive(Debug, Clone, Copy)]
pub struct ClockSource {
    period: Duration,
}

impl ClockSource {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Infinite stream of timestamps, first one immediately.
    ///
    /// Every call starts a fresh sequence; dropping the stream stops it.
    pub fn ticks(&self) -> impl Stream<Item = DateTime<Local>> + Send + 'static {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        stream::unfold(ticker, |mut ticker| async move {
            ticker.tick().await;
            Some((Local::now(), ticker))
        })
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::new()
    }
}
