//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexo_core::types::{FileId, FolderId, UserId};

use super::name::split_extension;

/// A row of the `files` table. The body lives in object storage at `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type as detected at upload.
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Containing folder (null at the drive root).
    pub folder_id: Option<FolderId>,
    /// The user allowed to unlock the file while it is private.
    pub owner_id: UserId,
    /// The uploader.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Private/lock flag.
    #[serde(default)]
    pub is_private: bool,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// Upload batch marker.
    #[serde(default)]
    pub upload_session: Option<String>,
}

impl FileRecord {
    /// Table holding file rows.
    pub const TABLE: &'static str = "files";

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        split_extension(&self.name).1.map(|ext| ext.to_lowercase())
    }
}

/// Data required to insert a file row after the body has been stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Target folder (None for the root).
    pub folder_id: Option<FolderId>,
    /// Uploader.
    pub user_id: UserId,
    /// Owner (the uploader at creation time).
    pub owner_id: UserId,
    /// Upload batch marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_session: Option<String>,
}
