use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::orchestrator::WorkflowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Master profile not loaded")]
    ProfileUnavailable,

    #[error("Generation failed: {0}")]
    Generation(#[from] WorkflowError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::ProfileUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROFILE_UNAVAILABLE")
            }
            AppError::Generation(_) => (StatusCode::BAD_GATEWAY, "GENERATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::ProfileUnavailable => {
                tracing::error!("Generation requested but no master profile is loaded");
                "Master profile not loaded".to_string()
            }
            AppError::Generation(e) => {
                tracing::error!(
                    "Generation error in run {} at stage {} after {} round(s): {}",
                    e.run_id,
                    e.stage,
                    e.state.review_round,
                    e.source
                );
                "An AI processing error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("job_description cannot be empty".into());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
    }

    #[test]
    fn test_profile_unavailable_is_server_error() {
        let response = AppError::ProfileUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_wraps_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status_and_code().1, "INTERNAL_ERROR");
    }
}
