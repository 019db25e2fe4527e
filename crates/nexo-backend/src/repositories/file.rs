//! File repository implementation.

use std::sync::Arc;

use serde_json::json;

use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{FileId, Filter, FolderId, Query, UserId};
use nexo_entity::file::{FileRecord, NewFileRecord};

use super::{decode_row, decode_rows, expect_changed};

/// Repository for file metadata rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    records: Arc<dyn RecordStore>,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId, token: &str) -> AppResult<Option<FileRecord>> {
        let query = Query::filtered(Filter::new().eq("id", id));
        let rows = self.records.select(FileRecord::TABLE, &query, token).await?;
        Ok(decode_rows::<FileRecord>(rows, "file")?.into_iter().next())
    }

    /// List files directly inside `folder` (the root when `None`), by name.
    pub async fn find_in_folder(
        &self,
        folder: Option<FolderId>,
        token: &str,
    ) -> AppResult<Vec<FileRecord>> {
        let query =
            Query::filtered(Filter::new().eq_or_null("folder_id", folder)).order_by("name");
        let rows = self.records.select(FileRecord::TABLE, &query, token).await?;
        decode_rows(rows, "file")
    }

    /// Insert file metadata and return the stored row.
    pub async fn create(&self, data: &NewFileRecord, token: &str) -> AppResult<FileRecord> {
        let row = self
            .records
            .insert(FileRecord::TABLE, serde_json::to_value(data)?, token)
            .await?;
        decode_row(row, "file")
    }

    /// Rename a file.
    pub async fn rename(&self, id: FileId, name: &str, token: &str) -> AppResult<()> {
        let changed = self
            .records
            .update(
                FileRecord::TABLE,
                &Filter::new().eq("id", id),
                json!({ "name": name }),
                token,
            )
            .await?;
        expect_changed(changed, "File")
    }

    /// Move a file to `folder` (`None` moves it to the root).
    pub async fn set_folder(
        &self,
        id: FileId,
        folder: Option<FolderId>,
        token: &str,
    ) -> AppResult<()> {
        let changed = self
            .records
            .update(
                FileRecord::TABLE,
                &Filter::new().eq("id", id),
                json!({ "folder_id": folder }),
                token,
            )
            .await?;
        expect_changed(changed, "File")
    }

    /// Set the private flag. Locking also records the new owner.
    pub async fn set_privacy(
        &self,
        id: FileId,
        is_private: bool,
        owner: Option<UserId>,
        token: &str,
    ) -> AppResult<()> {
        let patch = match owner {
            Some(owner) => json!({ "is_private": is_private, "owner_id": owner }),
            None => json!({ "is_private": is_private }),
        };
        let changed = self
            .records
            .update(FileRecord::TABLE, &Filter::new().eq("id", id), patch, token)
            .await?;
        expect_changed(changed, "File")
    }

    /// Delete a single file row.
    pub async fn delete(&self, id: FileId, token: &str) -> AppResult<u64> {
        self.records
            .delete(FileRecord::TABLE, &Filter::new().eq("id", id), token)
            .await
    }

    /// Delete every file row inside `folder`.
    pub async fn delete_in_folder(&self, folder: FolderId, token: &str) -> AppResult<u64> {
        self.records
            .delete(FileRecord::TABLE, &Filter::new().eq("folder_id", folder), token)
            .await
    }

    /// Delete the given file rows in one request. An empty list is a no-op.
    pub async fn delete_many(&self, ids: &[FileId], token: &str) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.records
            .delete(FileRecord::TABLE, &Filter::new().in_list("id", ids), token)
            .await
    }
}
