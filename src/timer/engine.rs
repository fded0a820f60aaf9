//! Working timer state machine.
//!
//! The engine owns no threads or timers; the countdown ticker calls `tick()`
//! once per second while a run is active.
//!
//! ```text
//! Idle --start--> Running --stop/expiry--> Idle
//! ```
//!
//! While idle the remaining time always equals the configured duration. A
//! duration change that arrives mid-run is only recorded and takes effect
//! the next time the engine enters `Idle`.

use tracing::{debug, info};

use crate::{
    error::TimerError,
    state::{Phase, Settings, TimerState},
};

/// Identifies one `start()` of the engine, so a tick scheduled for an
/// earlier run can be told apart from a live one
pub type RunId = u64;

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off the running countdown
    Advanced { remaining_seconds: u32 },
    /// The countdown reached zero; the engine is idle again
    Expired,
    /// Tick arrived while idle or for a run that has already ended
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    phase: Phase,
    remaining_seconds: u32,
    /// Read-only copy of the canonical settings
    settings: Settings,
    /// Length of the in-flight run, fixed at start
    run_total_seconds: u32,
    run_id: RunId,
}

impl TimerEngine {
    /// Create an idle engine seeded from loaded settings
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: settings.duration_seconds(),
            settings,
            run_total_seconds: settings.duration_seconds(),
            run_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.settings.duration_seconds()
    }

    /// Total the countdown is measured against: the in-flight run's length
    /// while running, the configured duration while idle
    pub fn total_seconds(&self) -> u32 {
        match self.phase {
            Phase::Running => self.run_total_seconds,
            Phase::Idle => self.duration_seconds(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Id of the current (or most recent) run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        }
    }

    /// Begin counting down from the configured duration
    pub fn start(&mut self) -> Result<RunId, TimerError> {
        if self.phase == Phase::Running {
            return Err(TimerError::InvalidTransition {
                action: "start",
                phase: self.phase,
            });
        }
        self.run_id += 1;
        self.run_total_seconds = self.remaining_seconds;
        self.phase = Phase::Running;
        info!(
            "Timer started (run {}, {}s)",
            self.run_id, self.remaining_seconds
        );
        Ok(self.run_id)
    }

    /// Abort the running countdown and reset to the current duration
    pub fn stop(&mut self) -> Result<(), TimerError> {
        if self.phase == Phase::Idle {
            return Err(TimerError::InvalidTransition {
                action: "stop",
                phase: self.phase,
            });
        }
        self.enter_idle();
        info!("Timer stopped (run {})", self.run_id);
        Ok(())
    }

    /// Advance the countdown of `run` by one second
    pub fn tick(&mut self, run: RunId) -> TickOutcome {
        if self.phase != Phase::Running || run != self.run_id {
            debug!(
                "Ignoring tick for run {} (current run {}, {})",
                run, self.run_id, self.phase
            );
            return TickOutcome::Ignored;
        }

        if self.remaining_seconds <= 1 {
            self.enter_idle();
            info!("Timer expired (run {})", self.run_id);
            return TickOutcome::Expired;
        }

        self.remaining_seconds -= 1;
        TickOutcome::Advanced {
            remaining_seconds: self.remaining_seconds,
        }
    }

    /// Take a new settings value into account.
    ///
    /// Returns `true` when the remaining time was re-derived, which only
    /// happens while idle.
    pub fn apply_settings(&mut self, settings: Settings) -> bool {
        self.settings = settings;
        match self.phase {
            Phase::Idle => {
                self.remaining_seconds = settings.duration_seconds();
                debug!("Idle timer reconciled to {}s", self.remaining_seconds);
                true
            }
            Phase::Running => {
                debug!(
                    "Duration change to {}min deferred until timer is idle",
                    settings.timer_duration
                );
                false
            }
        }
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_seconds = self.settings.duration_seconds();
    }
}
