//! pv-db: metadata persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, the [`models::ImageRecord`] model, its query module,
//! and the async [`store::ImageStore`] gateway used by the HTTP layer.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
