//! Stand Up Now - clock and working timer server
//!
//! This is the main entry point for the stand-up-now application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use stand_up_now::{
    api::create_router,
    config::Config,
    services::{AlertNotifier, BellAlertNotifier, ClockSource, CommandAlertNotifier},
    settings::{FileStore, SettingsController},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stand_up_now={},tower_http=info", config.log_level()))
        .init();

    info!("Starting stand-up-now server v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = config.settings_path();
    info!("Configuration: host={}, port={}, settings={}",
          config.host, config.port, settings_path.display());

    // Settings must be loaded before anything reads them
    let controller = Arc::new(SettingsController::new(Arc::new(FileStore::new(settings_path))));
    controller.load().await;

    let notifier: Arc<dyn AlertNotifier> = match &config.alert_command {
        Some(command) => {
            info!("Expiry alert command: {}", command);
            Arc::new(CommandAlertNotifier::new(command.clone()))
        }
        None => Arc::new(BellAlertNotifier),
    };

    let state = Arc::new(AppState::new(controller, notifier, config.port, config.host.clone())?);
    state.spawn_background_tasks(ClockSource::new());

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer         - Countdown phase, remaining time and progress");
    info!("  POST /timer/toggle  - Start or stop the working timer");
    info!("  POST /timer/start   - Start the working timer");
    info!("  POST /timer/stop    - Stop and reset the working timer");
    info!("  GET  /clock         - Current wall-clock time");
    info!("  GET  /settings      - Current settings");
    info!("  PUT  /settings      - Update the working duration");
    info!("  GET  /status        - Combined status");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
