//! Stand Up Now - a clock with a persisted, editable working countdown
//!
//! The library holds the timer state machine, the settings controller and
//! its storage backends, the clock and alert capabilities, and the HTTP API
//! a display client drives.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use settings::SettingsController;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
