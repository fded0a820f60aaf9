//! Display derivations for the countdown: normalized progress, the `m:ss`
//! label and cosmetic smoothing between successive progress values.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::TimerEngine;
use crate::state::{Phase, TimerState};

/// How long the animated progress takes to reach a new target
pub const ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Fraction of the countdown already elapsed, clamped to `[0, 1]`
pub fn progress(state: &TimerState, duration_seconds: u32) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    let remaining = f64::from(state.remaining_seconds) / f64::from(duration_seconds);
    (1.0 - remaining).clamp(0.0, 1.0)
}

/// Format seconds as `m:ss`, minutes unpadded
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Everything the presentation layer needs to draw the countdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub duration_seconds: u32,
    pub progress: f64,
    pub label: String,
}

impl ProgressView {
    pub fn from_engine(engine: &TimerEngine) -> Self {
        let state = engine.state();
        let duration_seconds = engine.total_seconds();
        Self {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            duration_seconds,
            progress: progress(&state, duration_seconds),
            label: format_remaining(state.remaining_seconds),
        }
    }
}

/// Linear interpolation from the last shown progress to the latest target.
///
/// Only ever fed from the engine; nothing read from here flows back into it.
#[derive(Debug, Clone)]
pub struct ProgressAnimator {
    from: f64,
    to: f64,
    started_at: Instant,
    duration: Duration,
}

impl ProgressAnimator {
    pub fn new(initial: f64, now: Instant) -> Self {
        Self::with_duration(initial, now, ANIMATION_DURATION)
    }

    pub fn with_duration(initial: f64, now: Instant, duration: Duration) -> Self {
        Self {
            from: initial,
            to: initial,
            started_at: now,
            duration,
        }
    }

    /// Start animating towards `target` from wherever the animation is now
    pub fn retarget(&mut self, target: f64, now: Instant) {
        self.from = self.value_at(now);
        self.to = target.clamp(0.0, 1.0);
        self.started_at = now;
    }

    /// Jump straight to `value`, e.g. when the timer is reset
    pub fn snap(&mut self, value: f64, now: Instant) {
        self.from = value;
        self.to = value;
        self.started_at = now;
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        self.from + (self.to - self.from) * t
    }
}
