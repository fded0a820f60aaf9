//! Expiry alert capability

use std::io::Write;

use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fire-and-forget signal raised when a countdown expires.
///
/// Implementations must return promptly and never panic; failures are
/// logged at their own boundary.
pub trait AlertNotifier: Send + Sync {
    fn notify(&self);
}

/// Runs a shell command (typically a sound player) on expiry
#[derive(Debug, Clone)]
pub struct CommandAlertNotifier {
    command: String,
}

impl CommandAlertNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl AlertNotifier for CommandAlertNotifier {
    fn notify(&self) {
        let command = self.command.clone();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No runtime available to run alert command: {}", command);
            return;
        };

        runtime.spawn(async move {
            debug!("Running alert command: {}", command);
            match Command::new("sh").arg("-c").arg(&command).output().await {
                Ok(output) if output.status.success() => {
                    info!("Alert played");
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Alert command failed: {}", stderr.trim());
                }
                Err(e) => {
                    warn!("Failed to execute alert command: {}", e);
                }
            }
        });
    }
}

/// Rings the terminal bell
#[derive(Debug, Clone, Copy, Default)]
pub struct BellAlertNotifier;

impl AlertNotifier for BellAlertNotifier {
    fn notify(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}
