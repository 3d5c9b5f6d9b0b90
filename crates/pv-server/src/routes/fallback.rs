//! Catch-all for requests no route answers.

use axum::extract::OriginalUri;

use crate::error::AppError;

/// Any unmatched path: 404 naming the path as requested.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    tracing::debug!(uri = %uri, "No route matched");
    AppError::path_not_found(uri)
}
