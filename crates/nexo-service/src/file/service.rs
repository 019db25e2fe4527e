//! File CRUD operations.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use nexo_backend::repositories::FileRepository;
use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::traits::ObjectStore;
use nexo_core::types::FileId;
use nexo_entity::file::{FileRecord, rename_preserving_extension};

use crate::context::SessionContext;

/// Manages file metadata and bodies.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Object storage holding the bodies.
    objects: Arc<dyn ObjectStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { file_repo, objects }
    }

    /// Gets a file by ID.
    pub async fn get(&self, ctx: &SessionContext, id: FileId) -> AppResult<FileRecord> {
        self.file_repo
            .find_by_id(id, ctx.token())
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Renames a file to `new_base`, keeping its extension. Returns the new name.
    pub async fn rename(
        &self,
        ctx: &SessionContext,
        id: FileId,
        new_base: &str,
    ) -> AppResult<String> {
        let file = self.get(ctx, id).await?;
        let name = rename_preserving_extension(&file.name, new_base)
            .ok_or_else(|| AppError::validation("File name cannot be empty"))?;

        self.file_repo.rename(id, &name, ctx.token()).await?;
        info!(
            user_id = %ctx.user_id,
            file_id = %id,
            from = %file.name,
            to = %name,
            "File renamed"
        );
        Ok(name)
    }

    /// Deletes a file row. The stored object is left in place.
    pub async fn delete(&self, ctx: &SessionContext, id: FileId) -> AppResult<()> {
        let removed = self.file_repo.delete(id, ctx.token()).await?;
        if removed == 0 {
            return Err(AppError::not_found("File not found"));
        }
        info!(user_id = %ctx.user_id, file_id = %id, "File deleted");
        Ok(())
    }

    /// Public URL of a file's body.
    pub async fn link(&self, ctx: &SessionContext, id: FileId) -> AppResult<String> {
        Ok(self.get(ctx, id).await?.url)
    }

    /// Downloads a file's body.
    pub async fn download(&self, ctx: &SessionContext, id: FileId) -> AppResult<(FileRecord, Bytes)> {
        let file = self.get(ctx, id).await?;
        let body = self.objects.fetch(&file.url).await?;
        info!(user_id = %ctx.user_id, file_id = %id, size = body.len(), "File downloaded");
        Ok((file, body))
    }
}
