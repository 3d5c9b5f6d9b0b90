//! Image record insert and lookup.
//!
//! Records are write-once; no update or delete query exists.

use pv_core::{Error, ImageId, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{ImageRecord, NewImageRecord};

const COLS: &str = "id, content_type, filename, path, user_id";

/// Insert a new image record, assigning its id.
pub fn insert_image(conn: &Connection, record: &NewImageRecord) -> Result<ImageRecord> {
    let id = ImageId::new();
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO images (id, content_type, filename, path, user_id, created_at)
         VALUES (?1,?2,?3,?4,?5,?6)",
        rusqlite::params![
            id.to_string(),
            record.content_type,
            record.filename,
            record.path,
            record.user_id,
            now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(record.clone().with_id(id))
}

/// Look up an image record by id.
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<ImageRecord>> {
    let q = format!("SELECT {COLS} FROM images WHERE id = ?1");
    conn.query_row(&q, [id.to_string()], ImageRecord::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}
