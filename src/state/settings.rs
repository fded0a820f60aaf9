//! Persisted user settings

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 120;
pub const DEFAULT_DURATION_MINUTES: u32 = 45;

/// The single persisted settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Working countdown length in minutes
    pub timer_duration: u32,
}

impl Settings {
    /// Build settings from raw user input, rejecting durations outside 1..=120
    pub fn new(timer_duration: i64) -> Result<Self, ValidationError> {
        let range = i64::from(MIN_DURATION_MINUTES)..=i64::from(MAX_DURATION_MINUTES);
        if !range.contains(&timer_duration) {
            return Err(ValidationError::DurationOutOfRange {
                minutes: timer_duration,
            });
        }
        Ok(Self {
            timer_duration: timer_duration as u32,
        })
    }

    /// Re-check a value that may have been deserialized or built by hand
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::new(i64::from(self.timer_duration)).map(|_| ())
    }

    pub fn duration_seconds(&self) -> u32 {
        self.timer_duration * 60
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_duration: DEFAULT_DURATION_MINUTES,
        }
    }
}
