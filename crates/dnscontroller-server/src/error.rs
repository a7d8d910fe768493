// ── HTTP error mapping ──

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use dnscontroller_core::{CoreError, StoreError};

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

/// A core failure plus the handler-level context it happened in.
#[derive(Debug, thiserror::Error)]
#[error("{message}: {source}")]
pub struct ApiError {
    message: &'static str,
    #[source]
    source: CoreError,
}

impl ApiError {
    pub fn new(message: &'static str, source: impl Into<CoreError>) -> Self {
        Self {
            message,
            source: source.into(),
        }
    }

    /// Client input errors are 400, missing rows 404, natural-key collisions
    /// 409, everything else 500.
    pub fn status(&self) -> StatusCode {
        match &self.source {
            CoreError::Validation(_) | CoreError::Parse { .. } => StatusCode::BAD_REQUEST,
            CoreError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            CoreError::Store(StoreError::Duplicate { .. }) => StatusCode::CONFLICT,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.source, "{}", self.message);
        } else {
            warn!(status = status.as_u16(), error = %self.source, "{}", self.message);
        }

        let body = ErrorResponse {
            message: self.message.to_owned(),
            error: self.source.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Attach handler context to a core result.
pub(crate) trait Context<T> {
    fn context(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E: Into<CoreError>> Context<T> for Result<T, E> {
    fn context(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(message, e))
    }
}
