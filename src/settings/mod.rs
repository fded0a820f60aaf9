//! Settings persistence and the controller that owns the canonical value

pub mod controller;
pub mod store;

pub use controller::{SettingsController, SETTINGS_STORAGE_KEY};
pub use store::{FileStore, MemoryStore, SettingsStore};
