//! Timer state structure and phase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current mode of the working timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Running => f.write_str("running"),
        }
    }
}

/// Snapshot of the countdown as seen by consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u32,
}

impl TimerState {
    /// Create an idle timer state reset to the given duration
    pub fn idle(duration_seconds: u32) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: duration_seconds,
        }
    }

    /// Create a running timer state with remaining seconds
    pub fn running(remaining_seconds: u32) -> Self {
        Self {
            phase: Phase::Running,
            remaining_seconds,
        }
    }
}
