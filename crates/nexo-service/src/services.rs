//! Service container.

use std::sync::Arc;

use nexo_backend::Backend;
use nexo_backend::repositories::{FileRepository, FolderRepository, UserRepository};
use nexo_core::config::AppConfig;

use crate::auth::AuthService;
use crate::file::{FileService, UploadService};
use crate::folder::{FolderService, TreeService};
use crate::item::ItemService;

/// Every service of the client, wired against one backend.
#[derive(Debug, Clone)]
pub struct Services {
    /// Registration, login and session handling.
    pub auth: Arc<AuthService>,
    /// Folder browsing and mutation.
    pub folders: Arc<FolderService>,
    /// File mutation and retrieval.
    pub files: Arc<FileService>,
    /// Cross-kind operations: move, privacy, bulk delete.
    pub items: Arc<ItemService>,
    /// Batch uploads.
    pub uploads: Arc<UploadService>,
}

impl Services {
    /// Build all services from a connected backend and the loaded config.
    pub fn new(backend: &Backend, config: &AppConfig) -> Self {
        let users = Arc::new(UserRepository::new(backend.records.clone()));
        let folder_repo = Arc::new(FolderRepository::new(backend.records.clone()));
        let file_repo = Arc::new(FileRepository::new(backend.records.clone()));

        let tree = Arc::new(TreeService::new(folder_repo.clone()));
        let auth = Arc::new(AuthService::new(
            backend.auth.clone(),
            users.clone(),
            config.auth.clone(),
            backend.anon_key.clone(),
        ));
        let folders = Arc::new(FolderService::new(
            folder_repo.clone(),
            file_repo.clone(),
            tree.clone(),
        ));
        let files = Arc::new(FileService::new(file_repo.clone(), backend.objects.clone()));
        let items = Arc::new(ItemService::new(
            folder_repo.clone(),
            file_repo.clone(),
            users,
            folders.clone(),
        ));
        let uploads = Arc::new(UploadService::new(
            file_repo,
            folder_repo,
            backend.objects.clone(),
            config.upload.clone(),
        ));

        Self {
            auth,
            folders,
            files,
            items,
            uploads,
        }
    }
}
