//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, response::Json};
use tracing::info;

use super::{
    error::ApiError,
    responses::{
        ClockResponse, HealthResponse, StatusResponse, TimerResponse, TransitionResponse,
        UpdateSettingsRequest,
    },
};
use crate::{
    error::SettingsError,
    state::{AppState, Settings},
};

/// Handle POST /timer/toggle - Start or stop depending on the current phase
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let timer = state.start_stop()?;
    info!("Toggle endpoint called - timer now {}", timer.phase);
    Ok(Json(TransitionResponse::new(timer)))
}

/// Handle POST /timer/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let timer = state.start()?;
    info!("Start endpoint called");
    Ok(Json(TransitionResponse::new(timer)))
}

/// Handle POST /timer/stop
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let timer = state.stop()?;
    info!("Stop endpoint called");
    Ok(Json(TransitionResponse::new(timer)))
}

/// Handle GET /timer
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    Json(TimerResponse::from_state(&state))
}

/// Handle GET /clock
pub async fn clock_handler(State(state): State<Arc<AppState>>) -> Json<ClockResponse> {
    let clock = state.current_clock_time();
    Json(ClockResponse {
        time: clock.now,
        display: clock.display(),
    })
}

/// Handle GET /settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.settings.current()?))
}

/// Handle PUT /settings - Validate and persist a new working duration
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, ApiError> {
    let minutes = request.minutes().map_err(SettingsError::from)?;
    let settings = state.update_duration(minutes).await?;
    info!("Settings endpoint called - duration set to {}min", settings.timer_duration);
    Ok(Json(settings))
}

/// Handle GET /status - Combined snapshot with server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        settings: state.settings.current()?,
        timer: TimerResponse::from_state(&state),
        clock: state.current_clock_time().display(),
        completed_countdowns: state.completed_countdowns(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
