//! Typed rows returned by the query layer.

use pv_core::ImageId;
use serde::Serialize;
use uuid::Uuid;

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(T::from(uuid))
}

// ---------------------------------------------------------------------------
// ImageRecord
// ---------------------------------------------------------------------------

/// Metadata describing one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[schema(value_type = String)]
    pub id: ImageId,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    pub filename: String,
    pub path: String,
    pub user_id: String,
}

impl ImageRecord {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            content_type: row.get(1)?,
            filename: row.get(2)?,
            path: row.get(3)?,
            user_id: row.get(4)?,
        })
    }
}

/// An image record that has not been stored yet and so has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    pub content_type: String,
    pub filename: String,
    pub path: String,
    pub user_id: String,
}

impl NewImageRecord {
    /// Attach the id assigned at insert time.
    pub fn with_id(self, id: ImageId) -> ImageRecord {
        ImageRecord {
            id,
            content_type: self.content_type,
            filename: self.filename,
            path: self.path,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let id = ImageId::new();
        let record = NewImageRecord {
            content_type: "image/png".into(),
            filename: "00112233445566778899aabbccddeeff.png".into(),
            path: "/srv/uploads/00112233445566778899aabbccddeeff.png".into(),
            user_id: "u1".into(),
        }
        .with_id(id);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["contentType"], "image/png");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["filename"], "00112233445566778899aabbccddeeff.png");
        assert!(json.get("content_type").is_none());
    }
}
