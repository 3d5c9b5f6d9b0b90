//! Axum router construction.
//!
//! Builds the application router with the landing page, the image routes,
//! the OpenAPI document, the not-found fallback, and middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, get_service, post};
use axum::{Json, Router};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(routes::images::create_image, routes::images::get_image),
    components(schemas(
        routes::images::UploadImageRequest,
        routes::images::CreatedResponse,
        routes::images::ErrorResponse,
        pv_db::models::ImageRecord,
    ))
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let index_path = ctx.config.server.index_path.clone();
    let max_body = ctx.config.uploads.max_bytes;

    tracing::debug!("Serving landing page from {}", index_path.display());

    Router::new()
        .route("/", get_service(ServeFile::new(index_path)))
        .route("/images", post(routes::images::create_image))
        .route("/images/{id}", get(routes::images::get_image))
        .route("/api-docs/openapi.json", get(openapi_json))
        .method_not_allowed_fallback(routes::fallback::not_found)
        .fallback(routes::fallback::not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
