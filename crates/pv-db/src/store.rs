//! The [`ImageStore`] gateway between request handlers and persistence.
//!
//! Handlers only see this trait; [`SqliteImageStore`] is the production
//! implementation and runs its blocking SQLite work off the async runtime.

use async_trait::async_trait;
use pv_core::{Error, ImageId, Result};

use crate::models::{ImageRecord, NewImageRecord};
use crate::pool::{get_conn, DbPool};
use crate::queries::images;

/// Persistent collection of image records.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert a record and return the id the store assigned to it.
    async fn save(&self, record: NewImageRecord) -> Result<ImageId>;

    /// Look up a record by its string id.
    ///
    /// Returns `Ok(None)` when no record has that id. An id that is not a
    /// canonical (lowercase, hyphenated) UUID fails with [`Error::Database`].
    async fn fetch_by_id(&self, id: &str) -> Result<Option<ImageRecord>>;
}

/// [`ImageStore`] backed by the r2d2 SQLite pool.
#[derive(Clone)]
pub struct SqliteImageStore {
    pool: DbPool,
}

impl SqliteImageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run a closure against a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            f(&conn)
        })
        .await
        .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
    }
}

#[async_trait]
impl ImageStore for SqliteImageStore {
    async fn save(&self, record: NewImageRecord) -> Result<ImageId> {
        let stored = self
            .with_conn(move |conn| images::insert_image(conn, &record))
            .await?;
        tracing::debug!(image_id = %stored.id, user_id = %stored.user_id, "Image record saved");
        Ok(stored.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<ImageRecord>> {
        let parsed: ImageId = id
            .parse()
            .map_err(|e| Error::database(format!("malformed image id {id:?}: {e}")))?;
        // Only the lowercase hyphenated form addresses a record.
        if parsed.to_string() != id {
            return Err(Error::database(format!("non-canonical image id {id:?}")));
        }
        self.with_conn(move |conn| images::get_image(conn, parsed)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn store() -> SqliteImageStore {
        SqliteImageStore::new(init_memory_pool().unwrap())
    }

    fn record(user_id: &str) -> NewImageRecord {
        NewImageRecord {
            content_type: "image/gif".into(),
            filename: "ffeeddccbbaa99887766554433221100.gif".into(),
            path: "/tmp/uploads/ffeeddccbbaa99887766554433221100.gif".into(),
            user_id: user_id.into(),
        }
    }

    #[tokio::test]
    async fn save_then_fetch() {
        let store = store();
        let id = store.save(record("u7")).await.unwrap();

        let fetched = store.fetch_by_id(&id.to_string()).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.user_id, "u7");
        assert_eq!(fetched.content_type, "image/gif");
    }

    #[tokio::test]
    async fn fetch_absent_is_none() {
        let store = store();
        let missing = ImageId::new().to_string();
        assert!(store.fetch_by_id(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_malformed_id_is_storage_error() {
        let store = store();
        let err = store.fetch_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
    }

    #[tokio::test]
    async fn fetch_alternate_uuid_forms_are_storage_errors() {
        let store = store();
        let id = store.save(record("u9")).await.unwrap();
        let canonical = id.to_string();

        let simple = canonical.replace('-', "");
        let variants = [
            canonical.to_uppercase(),
            simple.clone(),
            simple.to_uppercase(),
            format!("{{{canonical}}}"),
            format!("urn:uuid:{canonical}"),
        ];
        for variant in variants {
            let err = store.fetch_by_id(&variant).await.unwrap_err();
            assert!(matches!(err, Error::Database { .. }), "{variant} was accepted");
        }

        assert!(store.fetch_by_id(&canonical).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let store: std::sync::Arc<dyn ImageStore> = std::sync::Arc::new(store());
        let a = store.save(record("u1")).await.unwrap();
        let b = store.save(record("u1")).await.unwrap();
        assert_ne!(a, b);
    }
}
