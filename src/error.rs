//! Error types shared across the settings, timer and API layers

use thiserror::Error;

use crate::state::Phase;

/// Failures of the underlying key-value backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend refused the operation for a reason of its own
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Input rejected before any state is touched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid duration between 1 and 120 minutes (got {minutes})")]
    DurationOutOfRange { minutes: i64 },

    /// Not a whole number of minutes at all
    #[error("Please enter a valid duration between 1 and 120 minutes (got {input})")]
    InvalidDuration { input: String },
}

/// Errors surfaced by the settings controller
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save settings: {0}")]
    Persistence(#[from] StoreError),

    #[error("settings have not been loaded yet")]
    NotInitialized,
}

/// State machine misuse. The engine is left untouched when this is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("cannot {action} while timer is {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },
}
