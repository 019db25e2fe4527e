//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexo_core::types::{FolderId, UserId};

/// A row of the `folders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder (null for folders at the drive root).
    pub parent_id: Option<FolderId>,
    /// The user allowed to unlock the folder while it is private.
    pub owner_id: UserId,
    /// The user who created the folder.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Private/lock flag.
    #[serde(default)]
    pub is_private: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Batch marker set when the folder was created by a folder upload.
    #[serde(default)]
    pub upload_session: Option<String>,
}

impl Folder {
    /// Table holding folder rows.
    pub const TABLE: &'static str = "folders";

    /// Check if this folder sits at the drive root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to insert a folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Folder name (already trimmed).
    pub name: String,
    /// Parent folder (None for the root).
    pub parent_id: Option<FolderId>,
    /// Creator.
    pub user_id: UserId,
    /// Owner (the creator at creation time).
    pub owner_id: UserId,
    /// Upload batch marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_session: Option<String>,
}
