//! Countdown ticker background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::{
    state::AppState,
    timer::{RunId, TickOutcome},
};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick the countdown of `run` once per second until it expires or is
/// superseded. The first tick fires one full period after spawning.
pub async fn countdown_task(state: Arc<AppState>, run: RunId) {
    debug!("Starting countdown ticker for run {}", run);

    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        ticker.tick().await;

        match state.countdown_tick(run) {
            TickOutcome::Advanced { .. } => {}
            TickOutcome::Expired => {
                info!("Countdown for run {} finished", run);
                break;
            }
            TickOutcome::Ignored => {
                debug!("Run {} is no longer current, countdown ticker exiting", run);
                break;
            }
        }
    }
}
