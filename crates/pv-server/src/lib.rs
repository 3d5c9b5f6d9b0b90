//! pv-server: HTTP API server for image uploads.
//!
//! This crate ties pv-core and pv-db into a running server. It provides:
//!
//! - Axum router with the landing page and image create/fetch routes
//! - Upload acceptance (multipart intake, MIME allow-list, disk writes)
//! - Request-id and tracing middleware
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use pv_core::config::Config;
use pv_db::store::{ImageStore, SqliteImageStore};

use crate::context::AppContext;
use crate::upload::UploadDir;

/// Start the pixvault server.
///
/// Opens the metadata store and upload directory, builds the [`AppContext`],
/// and serves HTTP until a shutdown signal is received.
pub async fn start(config: Config) -> pv_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    // Initialize database.
    let db_path = &config.store.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let pool = pv_db::pool::init_pool(&db_str, config.store.pool_size)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    let uploads = UploadDir::open(&config.uploads.dir).await?;
    tracing::info!("Writing uploads to {}", uploads.root().display());

    let store: Arc<dyn ImageStore> = Arc::new(SqliteImageStore::new(pool));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| pv_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config, store, uploads);
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| pv_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Server is running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
