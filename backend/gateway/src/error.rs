//! Mapping of service errors to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ccswitch_core::SwitchError;
use serde_json::json;
use tracing::error;

/// Error body is `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<SwitchError> for ApiError {
    fn from(err: SwitchError) -> Self {
        if err.is_validation() {
            return Self::bad_request(err.to_string());
        }
        error!(error = %err, "Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
