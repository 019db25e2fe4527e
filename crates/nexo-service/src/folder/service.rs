//! Folder listing and CRUD operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use nexo_backend::repositories::{FileRepository, FolderRepository};
use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::types::FolderId;
use nexo_entity::file::FileRecord;
use nexo_entity::folder::{Breadcrumbs, Folder, NewFolder};

use crate::context::SessionContext;
use crate::folder::tree::TreeService;

/// Contents of one folder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderListing {
    /// Sub-folders, by name.
    pub folders: Vec<Folder>,
    /// Files, by name.
    pub files: Vec<FileRecord>,
    /// Path from the root to the listed folder.
    pub breadcrumbs: Breadcrumbs,
}

/// Rows removed by a recursive delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Folder rows removed.
    pub folders: u64,
    /// File rows removed.
    pub files: u64,
}

impl std::ops::AddAssign for DeleteSummary {
    fn add_assign(&mut self, other: Self) {
        self.folders += other.folders;
        self.files += other.files;
    }
}

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Tree walker.
    tree: Arc<TreeService>,
}

fn clean_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(name)
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        tree: Arc<TreeService>,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            tree,
        }
    }

    /// Lists a folder (the root when `None`).
    pub async fn list(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
    ) -> AppResult<FolderListing> {
        let folders = self.folder_repo.find_children(folder, ctx.token()).await?;
        let files = self.file_repo.find_in_folder(folder, ctx.token()).await?;
        let breadcrumbs = self.tree.breadcrumbs(ctx, folder).await?;

        debug!(
            folder_id = ?folder,
            folders = folders.len(),
            files = files.len(),
            "Folder listed"
        );

        Ok(FolderListing {
            folders,
            files,
            breadcrumbs,
        })
    }

    /// Gets a folder by ID.
    pub async fn get(&self, ctx: &SessionContext, id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(id, ctx.token())
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Creates a folder owned by the caller.
    pub async fn create(
        &self,
        ctx: &SessionContext,
        parent: Option<FolderId>,
        name: &str,
    ) -> AppResult<Folder> {
        let name = clean_name(name)?;
        let folder = self
            .folder_repo
            .create(
                &NewFolder {
                    name: name.to_string(),
                    parent_id: parent,
                    user_id: ctx.user_id,
                    owner_id: ctx.user_id,
                    upload_session: None,
                },
                ctx.token(),
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename(&self, ctx: &SessionContext, id: FolderId, name: &str) -> AppResult<()> {
        let name = clean_name(name)?;
        self.folder_repo.rename(id, name, ctx.token()).await?;
        info!(user_id = %ctx.user_id, folder_id = %id, name = %name, "Folder renamed");
        Ok(())
    }

    /// Root-to-leaf chain ending at `folder`.
    pub async fn breadcrumbs(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
    ) -> AppResult<Breadcrumbs> {
        self.tree.breadcrumbs(ctx, folder).await
    }

    /// Whether `target` is `dragged` or lies beneath it.
    pub async fn is_within(
        &self,
        ctx: &SessionContext,
        dragged: FolderId,
        target: FolderId,
    ) -> AppResult<bool> {
        self.tree.is_within(ctx, dragged, target).await
    }

    /// The folder and all its descendants, depth-first pre-order.
    pub async fn collect_subtree(
        &self,
        ctx: &SessionContext,
        id: FolderId,
    ) -> AppResult<Vec<FolderId>> {
        self.tree.collect_subtree(ctx, id).await
    }

    /// Deletes a folder with every descendant folder and file.
    ///
    /// Files go first, one request per collected folder, then folders
    /// leaf-first. Requests are not batched and a failure leaves whatever
    /// was already removed deleted.
    pub async fn delete(&self, ctx: &SessionContext, id: FolderId) -> AppResult<DeleteSummary> {
        let subtree = self.collect_subtree(ctx, id).await?;
        let mut summary = DeleteSummary::default();

        for folder_id in &subtree {
            summary.files += self
                .file_repo
                .delete_in_folder(*folder_id, ctx.token())
                .await?;
        }
        for folder_id in subtree.iter().rev() {
            summary.folders += self.folder_repo.delete(*folder_id, ctx.token()).await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            folders = summary.folders,
            files = summary.files,
            "Folder deleted recursively"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_in, signed_in_recording, store_file};
    use nexo_core::error::ErrorKind;

    #[tokio::test]
    async fn test_create_trims_and_rejects_blank() {
        let (services, ctx, _) = signed_in().await;
        let folder = services.folders.create(&ctx, None, "  Photos ").await.unwrap();
        assert_eq!(folder.name, "Photos");
        assert_eq!(folder.owner_id, ctx.user_id);
        assert_eq!(folder.user_id, Some(ctx.user_id));

        let err = services.folders.create(&ctx, None, "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_separates_levels() {
        let (services, ctx, _) = signed_in().await;
        let docs = services.folders.create(&ctx, None, "docs").await.unwrap();
        services.folders.create(&ctx, Some(docs.id), "inner").await.unwrap();
        store_file(&services, &ctx, None, "root.txt").await;
        store_file(&services, &ctx, Some(docs.id), "b.txt").await;
        store_file(&services, &ctx, Some(docs.id), "a.txt").await;

        let root = services.folders.list(&ctx, None).await.unwrap();
        assert_eq!(root.folders.len(), 1);
        assert_eq!(root.files.len(), 1);

        let inside = services.folders.list(&ctx, Some(docs.id)).await.unwrap();
        let names: Vec<_> = inside.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert_eq!(inside.folders[0].name, "inner");
    }

    #[tokio::test]
    async fn test_recursive_delete_leaves_others() {
        let (services, ctx, backend) = signed_in().await;
        let top = services.folders.create(&ctx, None, "top").await.unwrap();
        let mid = services.folders.create(&ctx, Some(top.id), "mid").await.unwrap();
        let leaf = services.folders.create(&ctx, Some(mid.id), "leaf").await.unwrap();
        let keep = services.folders.create(&ctx, None, "keep").await.unwrap();
        store_file(&services, &ctx, Some(top.id), "1.txt").await;
        store_file(&services, &ctx, Some(leaf.id), "2.txt").await;
        store_file(&services, &ctx, Some(keep.id), "3.txt").await;

        let summary = services.folders.delete(&ctx, top.id).await.unwrap();
        assert_eq!(summary, DeleteSummary { folders: 3, files: 2 });

        assert_eq!(backend.rows("folders").len(), 1);
        let files = backend.rows("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], "3.txt");
    }

    #[tokio::test]
    async fn test_delete_clears_files_before_folders_leaf_first() {
        let (services, ctx, recording) = signed_in_recording().await;
        let a = services.folders.create(&ctx, None, "a").await.unwrap();
        let b = services.folders.create(&ctx, Some(a.id), "b").await.unwrap();
        let c = services.folders.create(&ctx, Some(b.id), "c").await.unwrap();
        let d = services.folders.create(&ctx, Some(a.id), "d").await.unwrap();
        store_file(&services, &ctx, Some(a.id), "1.txt").await;
        store_file(&services, &ctx, Some(c.id), "2.txt").await;

        services.folders.delete(&ctx, a.id).await.unwrap();

        let files = |id: FolderId| ("files".to_string(), format!("folder_id=eq.{id}"));
        let folder = |id: FolderId| ("folders".to_string(), format!("id=eq.{id}"));
        assert_eq!(
            recording.deletes(),
            vec![
                files(a.id),
                files(b.id),
                files(c.id),
                files(d.id),
                folder(d.id),
                folder(c.id),
                folder(b.id),
                folder(a.id),
            ]
        );
    }
}
