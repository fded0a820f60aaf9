//! Wall-clock ticker background task

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info};

use crate::{services::ClockSource, state::AppState};

/// Keep the shared clock reading fresh until cancelled
pub async fn clock_ticker_task(state: Arc<AppState>, clock: ClockSource) {
    info!("Starting clock ticker ({:?} period)", clock.period());

    let mut ticks = Box::pin(clock.ticks());
    while let Some(now) = ticks.next().await {
        state.set_clock_time(now);
    }

    debug!("Clock ticker stream ended");
}
