use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: Option<String>,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: Some(message.into()),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized access")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden access")
    }

    /// Logs `detail` and produces a bare 500 without a body.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!("Request failed: {}", detail);
        HTTPError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        }
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => (self.status, Json(json!({ "message": message }))).into_response(),
            None => self.status.into_response(),
        }
    }
}
