//! Error types for the dev server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON payload")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid action specified")]
    InvalidAction(String),

    #[error("Input text exceeds the {limit}-word limit.")]
    OverLimit { count: usize, limit: usize },

    #[error("Research topic cannot be empty")]
    EmptyTopic,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidJson(e) => {
                tracing::debug!("Rejected payload: {}", e);
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidAction(action) => {
                tracing::debug!("Rejected action: {:?}", action);
                StatusCode::BAD_REQUEST
            }
            ApiError::OverLimit { .. } | ApiError::EmptyTopic => StatusCode::BAD_REQUEST,
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            ApiError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
