// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::gemini::GenerateError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("text and sender are required")]
    Validation,

    #[error(transparent)]
    Upstream(#[from] GenerateError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Transport, status and protocol failures all surface the same way.
        let (status, message) = match self {
            RelayError::Validation => (StatusCode::BAD_REQUEST, "Text and sender are required"),
            RelayError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get response from Google AI",
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required config key: {0}")]
    MissingKey(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
