//! Image upload and lookup route handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, OriginalUri, Path, State};
use axum::Json;
use pv_core::{ImageId, Result};
use pv_db::models::{ImageRecord, NewImageRecord};
use pv_db::store::ImageStore;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::upload::{self, StoredFile, ValidUpload};

/// Multipart body accepted by `POST /images` (documentation only).
#[derive(Debug, utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UploadImageRequest {
    /// JPEG, PNG, or GIF binary.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// Opaque owner id; must be non-empty.
    pub user_id: String,
}

/// Response for a stored upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

/// Error body for 400 and 500 responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /images
#[utoipa::path(
    post,
    path = "/images",
    request_body(content = UploadImageRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = CreatedResponse),
        (status = 400, description = "Missing or rejected image, or missing userId", body = ErrorResponse),
        (status = 500, description = "Disk or store failure", body = ErrorResponse)
    )
)]
pub async fn create_image(
    State(ctx): State<AppContext>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<CreatedResponse>, AppError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected non-multipart upload: {e}");
        upload::missing_fields()
    })?;

    let upload = upload::read_form(multipart).await?.validate()?;
    let stored = ctx
        .uploads
        .write(upload.image.kind, &upload.image.bytes)
        .await?;
    let id = persist(ctx.store.as_ref(), stored, upload).await?;

    Ok(Json(CreatedResponse { id: id.to_string() }))
}

/// Save metadata for an accepted file, discarding the file if the save fails.
async fn persist(store: &dyn ImageStore, stored: StoredFile, upload: ValidUpload) -> Result<ImageId> {
    let record = NewImageRecord {
        content_type: stored.kind.mime().to_string(),
        filename: stored.filename.clone(),
        path: stored.path_string(),
        user_id: upload.user_id,
    };

    match store.save(record).await {
        Ok(id) => {
            tracing::info!(image_id = %id, filename = %stored.filename, "Image created");
            Ok(id)
        }
        Err(e) => {
            stored.discard().await;
            Err(e)
        }
    }
}

/// GET /images/{id}
#[utoipa::path(
    get,
    path = "/images/{id}",
    params(("id" = String, Path, description = "Store-assigned image id")),
    responses(
        (status = 200, description = "Image metadata", body = ImageRecord),
        (status = 404, description = "No image with that id"),
        (status = 500, description = "Malformed id or store failure", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> std::result::Result<Json<ImageRecord>, AppError> {
    match ctx.store.fetch_by_id(&id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(AppError::path_not_found(uri)),
    }
}
