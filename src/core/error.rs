use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::validation::ValidationError;
use crate::download::error::ResolverError;

/// Centralized error type for the application
///
/// Every handler error is converted to this enum; `IntoResponse` turns it into
/// a `{ "message": ... }` JSON body with the matching status code.
///
/// # Example
///
/// ```
/// use igdl::core::error::AppError;
/// use igdl::core::validation::ValidationError;
///
/// let err: AppError = ValidationError::MissingUrl.into();
/// assert_eq!(err.to_string(), "Missing url");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing client input. Never retried.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resolver failed; the message is surfaced to the client as-is
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Proxied fetch failed or returned a non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Resolver(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for metrics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Resolver(e) => e.subcategory(),
            AppError::Upstream(_) => "upstream",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            log::error!("Request failed ({}): {}", status.as_u16(), message);
        } else {
            log::warn!("Rejected request ({}): {}", status.as_u16(), message);
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
