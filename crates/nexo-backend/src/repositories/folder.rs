//! Folder repository implementation.

use std::sync::Arc;

use serde_json::json;

use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{Filter, FolderId, Query, UserId};
use nexo_entity::folder::{Folder, NewFolder};

use super::{decode_row, decode_rows, expect_changed};

/// Repository for folder rows and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    records: Arc<dyn RecordStore>,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId, token: &str) -> AppResult<Option<Folder>> {
        let query = Query::filtered(Filter::new().eq("id", id));
        let rows = self.records.select(Folder::TABLE, &query, token).await?;
        Ok(decode_rows::<Folder>(rows, "folder")?.into_iter().next())
    }

    /// List the direct children of `parent` (the root when `None`), by name.
    pub async fn find_children(
        &self,
        parent: Option<FolderId>,
        token: &str,
    ) -> AppResult<Vec<Folder>> {
        let query = Query::filtered(Filter::new().eq_or_null("parent_id", parent)).order_by("name");
        let rows = self.records.select(Folder::TABLE, &query, token).await?;
        decode_rows(rows, "folder")
    }

    /// IDs of the direct children of `parent`, in name order.
    pub async fn find_child_ids(&self, parent: FolderId, token: &str) -> AppResult<Vec<FolderId>> {
        let query = Query::filtered(Filter::new().eq("parent_id", parent))
            .columns("id")
            .order_by("name");
        let rows = self.records.select(Folder::TABLE, &query, token).await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value::<FolderId>(row["id"].clone()).map_err(Into::into)
            })
            .collect()
    }

    /// Insert a folder and return the stored row.
    pub async fn create(&self, data: &NewFolder, token: &str) -> AppResult<Folder> {
        let row = self
            .records
            .insert(Folder::TABLE, serde_json::to_value(data)?, token)
            .await?;
        decode_row(row, "folder")
    }

    /// Rename a folder.
    pub async fn rename(&self, id: FolderId, name: &str, token: &str) -> AppResult<()> {
        let changed = self
            .records
            .update(Folder::TABLE, &Filter::new().eq("id", id), json!({ "name": name }), token)
            .await?;
        expect_changed(changed, "Folder")
    }

    /// Re-parent a folder (`None` moves it to the root).
    pub async fn set_parent(
        &self,
        id: FolderId,
        parent: Option<FolderId>,
        token: &str,
    ) -> AppResult<()> {
        let changed = self
            .records
            .update(
                Folder::TABLE,
                &Filter::new().eq("id", id),
                json!({ "parent_id": parent }),
                token,
            )
            .await?;
        expect_changed(changed, "Folder")
    }

    /// Set the private flag. Locking also records the new owner.
    pub async fn set_privacy(
        &self,
        id: FolderId,
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
            .update(Folder::TABLE, &Filter::new().eq("id", id), patch, token)
            .await?;
        expect_changed(changed, "Folder")
    }

    /// Delete a single folder row.
    pub async fn delete(&self, id: FolderId, token: &str) -> AppResult<u64> {
        self.records
            .delete(Folder::TABLE, &Filter::new().eq("id", id), token)
            .await
    }
}
