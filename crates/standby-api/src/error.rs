use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Authorization failure; never leaks whether the task body was valid.
    #[error("{0}")]
    Unauthorized(String),

    /// Bad JSON or payload validation failure.
    #[error("{0}")]
    InvalidRequest(String),

    /// Another task already holds the executing slot.
    #[error("{0}")]
    Conflict(String),

    /// Internal failure before acceptance.
    ///
    /// Part of the endpoint contract rather than a path the current
    /// handlers hit: every failure they can produce maps to a 4xx above.
    /// Kept so future pre-acceptance work (and custom launcher wiring)
    /// has a 500 with the documented body shape to return.
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, None),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, None),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, Some("conflict")),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorBody {
            error: self.to_string(),
            status,
        };
        (code, Json(body)).into_response()
    }
}
