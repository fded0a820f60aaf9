//! API error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::error::{SettingsError, TimerError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Timer(#[from] TimerError),
}

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Settings(SettingsError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Settings(SettingsError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Settings(SettingsError::NotInitialized) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timer(TimerError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!("Request failed ({}): {}", status, self);

        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{StoreError, ValidationError},
        state::Phase,
    };

    #[test]
    fn maps_errors_to_status_codes() {
        let validation: ApiError =
            SettingsError::from(ValidationError::DurationOutOfRange { minutes: 0 }).into();
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let persistence: ApiError =
            SettingsError::from(StoreError::Unavailable("x".to_string())).into();
        assert_eq!(persistence.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let transition: ApiError = TimerError::InvalidTransition {
            action: "stop",
            phase: Phase::Idle,
        }
        .into();
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);
    }
}
