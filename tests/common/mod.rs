//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires an in-memory metadata store and a
//! temporary upload directory into a full [`AppContext`] and serves it on a
//! random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pv_core::config::Config;
use pv_db::pool::init_memory_pool;
use pv_db::store::{ImageStore, SqliteImageStore};
use pv_server::context::AppContext;
use pv_server::router::build_router;
use pv_server::upload::UploadDir;
use tempfile::TempDir;

/// Landing page written into every harness.
pub const INDEX_HTML: &str = "<!DOCTYPE html><title>pixvault test</title>";

/// Smallest byte prefix that looks like a JPEG.
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0 fake jpeg data";

/// A running server plus the directories backing it.
pub struct TestHarness {
    pub addr: SocketAddr,
    pub ctx: AppContext,
    _dir: TempDir,
}

impl TestHarness {
    /// Start a server backed by a fresh in-memory SQLite store.
    pub async fn start() -> Self {
        let pool = init_memory_pool().expect("failed to create in-memory pool");
        Self::start_with_store(Arc::new(SqliteImageStore::new(pool))).await
    }

    /// Start a server backed by the given store.
    pub async fn start_with_store(store: Arc<dyn ImageStore>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.server.index_path = dir.path().join("index.html");
        config.uploads.dir = dir.path().join("uploads");
        std::fs::write(&config.server.index_path, INDEX_HTML).expect("failed to write index");

        let uploads = UploadDir::open(&config.uploads.dir)
            .await
            .expect("failed to open upload dir");
        let ctx = AppContext::new(config, store, uploads);
        let app = build_router(ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            ctx,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn upload_dir(&self) -> &Path {
        self.ctx.uploads.root()
    }

    /// Files currently in the upload directory.
    pub fn uploaded_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.upload_dir())
            .expect("failed to read upload dir")
            .map(|entry| entry.expect("bad dir entry").path())
            .collect();
        files.sort();
        files
    }

    /// POST a multipart form to `/images`.
    pub async fn upload(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url("/images"))
            .multipart(form)
            .send()
            .await
            .expect("upload request failed")
    }
}

/// A form with an `image` part of the given MIME type and an optional `userId`.
pub fn image_form(mime: &str, bytes: &[u8], user_id: Option<&str>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name("upload.bin")
        .mime_str(mime)
        .expect("valid mime");
    let form = reqwest::multipart::Form::new().part("image", part);
    match user_id {
        Some(user_id) => form.text("userId", user_id.to_string()),
        None => form,
    }
}
