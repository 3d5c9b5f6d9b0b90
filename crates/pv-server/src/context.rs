//! Application context shared by all request handlers.
//!
//! [`AppContext`] is built once at startup and handed to the router as Axum
//! state. It only holds `Arc`s, so cloning it per request is cheap.

use std::sync::Arc;

use pv_core::config::Config;
use pv_db::store::ImageStore;

use crate::upload::UploadDir;

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Metadata store gateway.
    pub store: Arc<dyn ImageStore>,
    /// Directory accepted uploads are written to.
    pub uploads: Arc<UploadDir>,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn ImageStore>, uploads: UploadDir) -> Self {
        Self {
            config: Arc::new(config),
            store,
            uploads: Arc::new(uploads),
        }
    }
}
