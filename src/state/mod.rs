//! State management module
//!
//! Settings, timer and clock values plus the `AppState` that ties them
//! together for the API and background tasks.

pub mod app_state;
pub mod clock_state;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use clock_state::ClockState;
pub use settings::Settings;
pub use timer_state::{Phase, TimerState};
