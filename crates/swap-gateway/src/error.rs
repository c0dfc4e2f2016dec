//! Engine-to-HTTP error translation.
//!
//! Handlers never build responses from raw engine errors. Everything funnels
//! through [`ApiError`], which pairs the error's kind with an HTTP status and
//! serializes as `{"error": "<detail>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared_types::{ErrorKind, SwapError};

/// Error envelope every handler returns.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Missing or malformed `x-user-id` header.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: "missing or malformed x-user-id header".into(),
        }
    }
}

impl From<SwapError> for ApiError {
    fn from(err: SwapError) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::StorageTransaction => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.detail }));
        (self.status, body).into_response()
    }
}
