//! Mapping from handler failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use usergraph_core::ValidationError;
use usergraph_graph::GraphError;

/// Error handling for API endpoints.
///
/// Store failures are logged with full detail but answered with the generic
/// `message` only.
#[derive(Debug)]
pub enum ApiError {
    InvalidJson(String),
    Validation(ValidationError),
    NotFound(&'static str),
    Rejected {
        message: &'static str,
        source: GraphError,
    },
    Store {
        message: &'static str,
        source: GraphError,
    },
}

impl ApiError {
    /// Wrap a store failure behind a client-safe message.
    pub fn store(message: &'static str, source: GraphError) -> Self {
        Self::Store { message, source }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidJson(reason) => {
                tracing::warn!(%reason, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid JSON body" }),
                )
            }
            ApiError::Validation(err) => {
                tracing::warn!(issues = %err, "Validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Validation failed", "details": err.issues }),
                )
            }
            ApiError::NotFound(message) => {
                tracing::info!(reason = message, "Not found");
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            ApiError::Rejected { message, source } => {
                tracing::warn!(error = %source, "{message}");
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Store { message, source } => {
                tracing::error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
