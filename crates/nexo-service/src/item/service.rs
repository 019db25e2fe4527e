//! Move, privacy and bulk-delete operations across both item kinds.

use std::sync::Arc;

use tracing::{info, warn};

use nexo_backend::repositories::{FileRepository, FolderRepository, UserRepository};
use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::types::{FileId, FolderId};
use nexo_entity::item::{Item, ItemRef};

use crate::context::SessionContext;
use crate::folder::{DeleteSummary, FolderService};

/// Cross-kind item operations.
#[derive(Debug, Clone)]
pub struct ItemService {
    folder_repo: Arc<FolderRepository>,
    file_repo: Arc<FileRepository>,
    users: Arc<UserRepository>,
    folders: Arc<FolderService>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        users: Arc<UserRepository>,
        folders: Arc<FolderService>,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            users,
            folders,
        }
    }

    /// Loads the row behind a reference.
    pub async fn load(&self, ctx: &SessionContext, item: ItemRef) -> AppResult<Item> {
        match item {
            ItemRef::Folder(id) => self
                .folder_repo
                .find_by_id(id, ctx.token())
                .await?
                .map(Item::Folder)
                .ok_or_else(|| AppError::not_found("Folder not found")),
            ItemRef::File(id) => self
                .file_repo
                .find_by_id(id, ctx.token())
                .await?
                .map(Item::File)
                .ok_or_else(|| AppError::not_found("File not found")),
        }
    }

    /// Moves an item into `target` (the root when `None`).
    ///
    /// A folder cannot be moved into itself or any of its descendants.
    pub async fn move_item(
        &self,
        ctx: &SessionContext,
        item: ItemRef,
        target: Option<FolderId>,
    ) -> AppResult<()> {
        match item {
            ItemRef::Folder(id) => {
                if let Some(target) = target {
                    if target == id {
                        return Err(AppError::validation("Cannot move a folder into itself"));
                    }
                    if self.folders.is_within(ctx, id, target).await? {
                        warn!(
                            folder_id = %id,
                            target = %target,
                            "Rejected move into own subfolder"
                        );
                        return Err(AppError::validation(
                            "Cannot move a folder into one of its subfolders",
                        ));
                    }
                }
                self.folder_repo.set_parent(id, target, ctx.token()).await?;
            }
            ItemRef::File(id) => {
                self.file_repo.set_folder(id, target, ctx.token()).await?;
            }
        }

        info!(
            user_id = %ctx.user_id,
            kind = item.kind().label(),
            item_id = %item.id_string(),
            target = ?target,
            "Item moved"
        );
        Ok(())
    }

    /// Locks an unlocked item or unlocks a locked one. Returns the new state.
    pub async fn toggle_private(&self, ctx: &SessionContext, item: ItemRef) -> AppResult<bool> {
        let loaded = self.load(ctx, item).await?;
        if loaded.is_private() {
            self.unlock_loaded(ctx, &loaded).await?;
            Ok(false)
        } else {
            self.lock_loaded(ctx, &loaded).await?;
            Ok(true)
        }
    }

    /// Marks an item private and records the caller as its owner.
    pub async fn lock(&self, ctx: &SessionContext, item: ItemRef) -> AppResult<()> {
        let loaded = self.load(ctx, item).await?;
        if loaded.is_private() {
            self.ensure_owner(ctx, &loaded).await?;
        }
        self.lock_loaded(ctx, &loaded).await
    }

    /// Clears the private flag. Only the owner may unlock.
    pub async fn unlock(&self, ctx: &SessionContext, item: ItemRef) -> AppResult<()> {
        let loaded = self.load(ctx, item).await?;
        self.unlock_loaded(ctx, &loaded).await
    }

    async fn lock_loaded(&self, ctx: &SessionContext, item: &Item) -> AppResult<()> {
        self.set_privacy(ctx, item.item_ref(), true).await?;
        info!(
            user_id = %ctx.user_id,
            item_id = %item.item_ref().id_string(),
            "Item locked"
        );
        Ok(())
    }

    async fn unlock_loaded(&self, ctx: &SessionContext, item: &Item) -> AppResult<()> {
        if item.is_private() {
            self.ensure_owner(ctx, item).await?;
        }
        self.set_privacy(ctx, item.item_ref(), false).await?;
        info!(
            user_id = %ctx.user_id,
            item_id = %item.item_ref().id_string(),
            "Item unlocked"
        );
        Ok(())
    }

    async fn ensure_owner(&self, ctx: &SessionContext, item: &Item) -> AppResult<()> {
        if item.owner_id() == ctx.user_id {
            return Ok(());
        }
        let email = self
            .users
            .find_email(item.owner_id(), ctx.token())
            .await?
            .unwrap_or_else(|| item.owner_id().to_string());
        warn!(
            user_id = %ctx.user_id,
            owner_id = %item.owner_id(),
            item_id = %item.item_ref().id_string(),
            "Unlock refused for non-owner"
        );
        Err(AppError::authorization(format!(
            "This item can only be unlocked by the user: {email}"
        )))
    }

    async fn set_privacy(&self, ctx: &SessionContext, item: ItemRef, locked: bool) -> AppResult<()> {
        let owner = locked.then_some(ctx.user_id);
        match item {
            ItemRef::Folder(id) => {
                self.folder_repo
                    .set_privacy(id, locked, owner, ctx.token())
                    .await
            }
            ItemRef::File(id) => {
                self.file_repo
                    .set_privacy(id, locked, owner, ctx.token())
                    .await
            }
        }
    }

    /// Deletes a mixed selection: folders recursively first, then every
    /// selected file in a single request.
    pub async fn bulk_delete(
        &self,
        ctx: &SessionContext,
        items: &[ItemRef],
    ) -> AppResult<DeleteSummary> {
        let mut summary = DeleteSummary::default();
        let mut files: Vec<FileId> = Vec::new();

        for item in items {
            match item {
                ItemRef::Folder(id) => summary += self.folders.delete(ctx, *id).await?,
                ItemRef::File(id) => files.push(*id),
            }
        }
        summary.files += self.file_repo.delete_many(&files, ctx.token()).await?;

        info!(
            user_id = %ctx.user_id,
            folders = summary.folders,
            files = summary.files,
            "Bulk delete finished"
        );
        Ok(summary)
    }

    /// Text to put on the clipboard: the folder name, or the file's public URL.
    pub async fn copy_target(&self, ctx: &SessionContext, item: ItemRef) -> AppResult<String> {
        Ok(match self.load(ctx, item).await? {
            Item::Folder(folder) => folder.name,
            Item::File(file) => file.url,
        })
    }
}
