//! API response structures

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ValidationError,
    state::{AppState, Phase, Settings, TimerState},
    timer::ProgressView,
};

/// Countdown snapshot returned by the timer endpoints
#[derive(Debug, Clone, Serialize)]
pub struct TimerResponse {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub duration_seconds: u32,
    pub progress: f64,
    pub animated_progress: f64,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

impl TimerResponse {
    pub fn from_state(state: &AppState) -> Self {
        let ProgressView {
            phase,
            remaining_seconds,
            duration_seconds,
            progress,
            label,
        } = state.progress_view();

        Self {
            phase,
            remaining_seconds,
            duration_seconds,
            progress,
            animated_progress: state.animated_progress(),
            label,
            timestamp: Utc::now(),
        }
    }
}

/// Result of a start/stop request
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub message: String,
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub timestamp: DateTime<Utc>,
}

impl TransitionResponse {
    pub fn new(timer: TimerState) -> Self {
        let message = match timer.phase {
            Phase::Running => "Timer started",
            Phase::Idle => "Timer stopped",
        };
        Self {
            message: message.to_string(),
            phase: timer.phase,
            remaining_seconds: timer.remaining_seconds,
            timestamp: Utc::now(),
        }
    }
}

/// Current wall-clock reading
#[derive(Debug, Clone, Serialize)]
pub struct ClockResponse {
    pub time: DateTime<Local>,
    pub display: String,
}

/// Body of `PUT /settings`
///
/// The duration is kept as raw JSON so that strings, fractions and missing
/// values reach validation instead of failing body extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub timer_duration: Value,
}

impl UpdateSettingsRequest {
    /// Whole minutes requested by the client
    pub fn minutes(&self) -> Result<i64, ValidationError> {
        let invalid = || ValidationError::InvalidDuration {
            input: self.timer_duration.to_string(),
        };

        match &self.timer_duration {
            Value::Number(number) => {
                if let Some(minutes) = number.as_i64() {
                    return Ok(minutes);
                }
                match number.as_f64() {
                    // Saturating cast; anything huge fails the range check later
                    Some(minutes) if minutes.fract() == 0.0 => Ok(minutes as i64),
                    _ => Err(invalid()),
                }
            }
            Value::String(text) => text.trim().parse().map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Combined status with server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub settings: Settings,
    pub timer: TimerResponse,
    pub clock: String,
    pub completed_countdowns: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
