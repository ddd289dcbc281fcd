//! Mapping of service errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sdk::errors::{GatewayError, ValidationError};
use serde_json::json;

/// Error type for HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Client payload failed validation
    Validation(ValidationError),

    /// The completion service failed
    Gateway(GatewayError),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        Self::Gateway(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => {
                tracing::debug!(field = e.field(), "Rejected request: {}", e);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            Self::Gateway(e) => {
                tracing::error!(status = ?e.status(), error = %e, "Completion request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.detail() })),
                )
                    .into_response()
            }
        }
    }
}
