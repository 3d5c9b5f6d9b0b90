//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`pv_core::Error`] so that route handlers
//! can return `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Body sent for every server-side failure. Internal detail stays in the logs.
pub const GENERIC_ERROR: &str = "An error occurred.  Try again later.";

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: pv_core::Error,
}

impl AppError {
    pub fn new(inner: pv_core::Error) -> Self {
        Self { inner }
    }

    /// The 404 returned for a path nothing answers to.
    pub fn path_not_found(path: impl std::fmt::Display) -> Self {
        Self::new(pv_core::Error::not_found("path", path))
    }
}

impl From<pv_core::Error> for AppError {
    fn from(e: pv_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.inner {
            pv_core::Error::NotFound { id, .. } => {
                json!({ "err": format!("Path {id} does not exist") })
            }
            pv_core::Error::Validation(message) => json!({ "error": message }),
            _ => {
                tracing::error!(
                    status = %status,
                    error = %self.inner,
                    "Server error in API handler"
                );
                json!({ "error": GENERIC_ERROR })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
