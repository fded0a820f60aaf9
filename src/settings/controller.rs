//! Owner of the canonical settings value

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use super::store::SettingsStore;
use crate::{error::SettingsError, state::Settings};

/// Fixed storage key of the settings record
pub const SETTINGS_STORAGE_KEY: &str = "@stand_up_now_settings";

/// Mediates every read and write of `Settings` against the store.
///
/// Consumers get the value through `current()` or a `subscribe()`d
/// receiver; the value only changes after a successful write.
pub struct SettingsController {
    store: Arc<dyn SettingsStore>,
    settings_tx: watch::Sender<Settings>,
    initialized: AtomicBool,
    /// Serialises persist-then-publish so updates cannot interleave
    write_lock: Mutex<()>,
}

impl SettingsController {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let (settings_tx, _) = watch::channel(Settings::default());
        Self {
            store,
            settings_tx,
            initialized: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted record, falling back to defaults.
    ///
    /// A missing, unreadable, malformed or out-of-range record all yield
    /// the default settings. Marks the controller initialized.
    pub async fn load(&self) -> Settings {
        let settings = match self.store.get(SETTINGS_STORAGE_KEY).await {
            Ok(Some(raw)) => parse_record(&raw).unwrap_or_else(|| {
                warn!("Ignoring malformed settings record: {}", raw);
                Settings::default()
            }),
            Ok(None) => {
                info!("No saved settings, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!("Error loading settings, using defaults: {}", e);
                Settings::default()
            }
        };

        self.settings_tx.send_replace(settings);
        self.initialized.store(true, Ordering::Release);
        info!("Settings loaded: timer duration {}min", settings.timer_duration);
        settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Current canonical settings
    pub fn current(&self) -> Result<Settings, SettingsError> {
        if !self.is_initialized() {
            return Err(SettingsError::NotInitialized);
        }
        Ok(*self.settings_tx.borrow())
    }

    /// Receiver notified after every successful update
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.settings_tx.subscribe()
    }

    /// Validate, persist, then publish `new_settings`.
    ///
    /// On any error the canonical value is left unchanged.
    pub async fn update(&self, new_settings: Settings) -> Result<(), SettingsError> {
        new_settings.validate()?;
        if !self.is_initialized() {
            return Err(SettingsError::NotInitialized);
        }

        let _guard = self.write_lock.lock().await;
        let raw = serde_json::to_string(&new_settings).map_err(crate::error::StoreError::from)?;
        if let Err(e) = self.store.set(SETTINGS_STORAGE_KEY, &raw).await {
            warn!("Error saving settings: {}", e);
            return Err(e.into());
        }

        self.settings_tx.send_replace(new_settings);
        info!("Settings updated: timer duration {}min", new_settings.timer_duration);
        Ok(())
    }
}

fn parse_record(raw: &str) -> Option<Settings> {
    let settings: Settings = serde_json::from_str(raw).ok()?;
    settings.validate().ok()?;
    Some(settings)
}
