//! Kind-agnostic references to folders and files.
//!
//! Moves, privacy toggles and bulk deletes act on either table; these
//! types carry which one.

use serde::{Deserialize, Serialize};

use nexo_core::types::{FileId, FolderId, UserId};

use crate::file::FileRecord;
use crate::folder::Folder;

/// Which table an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A row of `folders`.
    Folder,
    /// A row of `files`.
    File,
}

impl ItemKind {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Folder => Folder::TABLE,
            Self::File => FileRecord::TABLE,
        }
    }

    /// Column pointing at the containing folder.
    pub fn parent_column(&self) -> &'static str {
        match self {
            Self::Folder => "parent_id",
            Self::File => "folder_id",
        }
    }

    /// Lowercase label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

/// A reference to a folder or a file by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ItemRef {
    /// A folder id.
    Folder(FolderId),
    /// A file id.
    File(FileId),
}

impl ItemRef {
    /// The item's table.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::File(_) => ItemKind::File,
        }
    }

    /// The id as the string the backend filters on.
    pub fn id_string(&self) -> String {
        match self {
            Self::Folder(id) => id.to_string(),
            Self::File(id) => id.to_string(),
        }
    }
}

/// A loaded folder or file row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    /// A folder row.
    Folder(Folder),
    /// A file row.
    File(FileRecord),
}

impl Item {
    /// Reference to this item.
    pub fn item_ref(&self) -> ItemRef {
        match self {
            Self::Folder(f) => ItemRef::Folder(f.id),
            Self::File(f) => ItemRef::File(f.id),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::File(f) => &f.name,
        }
    }

    /// Owner recorded on the row.
    pub fn owner_id(&self) -> UserId {
        match self {
            Self::Folder(f) => f.owner_id,
            Self::File(f) => f.owner_id,
        }
    }

    /// Private/lock flag.
    pub fn is_private(&self) -> bool {
        match self {
            Self::Folder(f) => f.is_private,
            Self::File(f) => f.is_private,
        }
    }
}
