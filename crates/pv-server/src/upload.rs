//! Upload acceptance: multipart intake, MIME allow-listing, and disk writes.
//!
//! A create request moves through [`read_form`] → [`UploadForm::validate`] →
//! [`UploadDir::write`]. Nothing touches the disk until validation passes, so a
//! rejected or incomplete request never leaves a file behind.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use pv_core::{Error, ImageKind, Result};
use rand::RngCore;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Client-facing message for every rejected create request.
pub const MISSING_FIELDS: &str = "Request body needs an 'image' file and 'userId' field.";

/// Multipart field carrying the image binary.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the owning user id.
pub const USER_ID_FIELD: &str = "userId";

/// The validation failure returned for any bad create request.
pub fn missing_fields() -> Error {
    Error::Validation(MISSING_FIELDS.into())
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// An image whose declared MIME type passed the allow-list.
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    pub kind: ImageKind,
    pub bytes: Bytes,
}

/// Fields collected from a create request, before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<AcceptedImage>,
    pub user_id: Option<String>,
}

/// A create request that has everything it needs.
#[derive(Debug, Clone)]
pub struct ValidUpload {
    pub image: AcceptedImage,
    pub user_id: String,
}

impl UploadForm {
    /// Require an accepted image and a non-empty `userId`.
    pub fn validate(self) -> Result<ValidUpload> {
        match (self.image, self.user_id) {
            (Some(image), Some(user_id)) if !user_id.is_empty() => {
                Ok(ValidUpload { image, user_id })
            }
            (image, user_id) => {
                tracing::debug!(
                    has_image = image.is_some(),
                    has_user_id = user_id.as_deref().is_some_and(|u| !u.is_empty()),
                    "Rejecting incomplete upload"
                );
                Err(missing_fields())
            }
        }
    }
}

/// Drain a multipart body into an [`UploadForm`].
///
/// The first `image` file with an allow-listed MIME type is kept; files with
/// any other declared type are dropped as though they were never sent.
/// Unknown text fields are ignored.
pub async fn read_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {e}");
        missing_fields()
    })? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let declared = field.content_type().unwrap_or_default().to_string();
                let Some(kind) = ImageKind::from_mime(&declared) else {
                    tracing::info!(content_type = %declared, "Dropping image with disallowed type");
                    continue;
                };
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read image field: {e}");
                    missing_fields()
                })?;
                if form.image.is_none() {
                    form.image = Some(AcceptedImage { kind, bytes });
                }
            }
            Some(USER_ID_FIELD) => {
                let text = field.text().await.map_err(|e| {
                    tracing::debug!("Failed to read userId field: {e}");
                    missing_fields()
                })?;
                form.user_id = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Random `<32 hex chars>.<ext>` filename from 16 bytes of OS-seeded entropy.
pub fn random_filename(kind: ImageKind) -> String {
    let mut raw = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut raw);
    format!("{}.{}", hex::encode(raw), kind.extension())
}

/// The fixed directory accepted uploads are written to.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

/// A payload that has been written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub kind: ImageKind,
    pub filename: String,
    pub path: PathBuf,
}

impl UploadDir {
    /// Create the directory if needed and resolve it to an absolute path.
    pub async fn open(dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let root = tokio::fs::canonicalize(dir).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a freshly generated filename.
    pub async fn write(&self, kind: ImageKind, bytes: &[u8]) -> Result<StoredFile> {
        self.write_named(kind, random_filename(kind), bytes).await
    }

    /// Write `bytes` as `filename`, failing if that file already exists.
    async fn write_named(
        &self,
        kind: ImageKind,
        filename: String,
        bytes: &[u8],
    ) -> Result<StoredFile> {
        let path = self.root.join(&filename);

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        fill_or_remove(&path, file, bytes).await?;

        tracing::info!(
            filename = %filename,
            content_type = %kind,
            size_bytes = bytes.len(),
            "Stored uploaded image"
        );

        Ok(StoredFile {
            kind,
            filename,
            path,
        })
    }
}

/// Write `bytes` into the freshly created file at `path`, removing the file
/// if the write does not complete.
async fn fill_or_remove<W>(path: &Path, mut out: W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match out.write_all(bytes).await {
        Ok(()) => out.flush().await,
        Err(e) => Err(e),
    };
    drop(out);

    if written.is_err() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), "Failed to remove partial upload: {e}");
        }
    }
    written
}

impl StoredFile {
    /// The stored path as recorded in metadata.
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Remove the file after a later step failed.
    ///
    /// Best-effort: a failure is logged, not returned.
    pub async fn discard(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "Removed orphaned upload"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "Failed to remove orphaned upload: {e}"
            ),
        }
    }
}
