//! Batch uploads: picked files, dropped paths and whole folders.
//!
//! Each file is stored under `<user id>/<random>.<ext>` in object storage,
//! then its metadata row is inserted with the batch's `upload_session`
//! marker. Files go one at a time; a cancelled batch stops before the next
//! file and keeps what was already stored.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use nexo_backend::repositories::{FileRepository, FolderRepository};
use nexo_core::config::UploadConfig;
use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::traits::{ObjectStore, ProgressFn};
use nexo_core::types::{FolderId, UserId};
use nexo_entity::file::{FileRecord, NewFileRecord, split_extension};
use nexo_entity::folder::{Folder, NewFolder};

use crate::context::SessionContext;
use crate::file::collect::{self, DroppedFiles, FolderEntry, LocalFile};
use crate::file::progress::UploadProgress;

/// Outcome of a batch upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    /// Marker written to every row of the batch.
    pub session: String,
    /// Folders created for a folder upload.
    pub folders: Vec<Folder>,
    /// File rows inserted.
    pub files: Vec<FileRecord>,
    /// Whether the batch stopped early on cancellation.
    pub cancelled: bool,
}

/// Handles file and folder uploads.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Object storage.
    objects: Arc<dyn ObjectStore>,
    /// Upload limits.
    config: UploadConfig,
}

/// Object key for a new upload: `<user id>/<uuid>.<ext>`.
pub fn object_key(user_id: UserId, file_name: &str) -> String {
    match split_extension(file_name).1 {
        Some(ext) => format!("{user_id}/{}.{ext}", Uuid::new_v4()),
        None => format!("{user_id}/{}", Uuid::new_v4()),
    }
}

/// Batch marker: the batch start time in milliseconds since the epoch.
pub fn new_upload_session() -> String {
    Utc::now().timestamp_millis().to_string()
}

async fn read_local(file: &LocalFile) -> AppResult<Bytes> {
    tokio::fs::read(&file.path).await.map(Bytes::from).map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Cannot read {}: {e}", file.path.display()),
            e,
        )
    })
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        folder_repo: Arc<FolderRepository>,
        objects: Arc<dyn ObjectStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            objects,
            config,
        }
    }

    /// Largest accepted file in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.config.max_file_size_bytes
    }

    /// Reject the batch if any file is over the limit.
    pub fn check_batch(&self, files: &[&LocalFile]) -> AppResult<()> {
        collect::check_batch_size(files, self.config.max_file_size_bytes)
    }

    /// Flatten dropped paths, skipping oversized files.
    pub fn collect_dropped(&self, paths: &[PathBuf]) -> AppResult<DroppedFiles> {
        collect::collect_dropped(paths, self.config.max_file_size_bytes)
    }

    /// Store one body and insert its metadata row.
    pub async fn upload_bytes(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
        name: &str,
        data: Bytes,
        session: Option<&str>,
        progress: Option<ProgressFn>,
    ) -> AppResult<FileRecord> {
        let key = object_key(ctx.user_id, name);
        let mime_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string();
        let size = data.len() as u64;

        self.objects
            .upload(&key, data, &mime_type, ctx.token(), progress)
            .await?;
        let url = self.objects.public_url(&key);

        let record = self
            .file_repo
            .create(
                &NewFileRecord {
                    name: name.to_string(),
                    size,
                    mime_type,
                    url,
                    folder_id: folder,
                    user_id: ctx.user_id,
                    owner_id: ctx.user_id,
                    upload_session: session.map(str::to_string),
                },
                ctx.token(),
            )
            .await?;

        debug!(file_id = %record.id, key = %key, size, "File stored");
        Ok(record)
    }

    /// Upload picked or dropped files into `folder`.
    pub async fn upload_files(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
        files: &[LocalFile],
        progress: Option<Arc<UploadProgress>>,
        cancel: &CancellationToken,
    ) -> AppResult<UploadReport> {
        self.check_batch(&files.iter().collect::<Vec<_>>())?;

        let mut report = UploadReport {
            session: new_upload_session(),
            ..UploadReport::default()
        };

        for file in files {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let record = self
                .upload_local(ctx, folder, file, &report.session, progress.as_ref())
                .await?;
            report.files.push(record);
        }

        self.log_report(ctx, folder, &report);
        Ok(report)
    }

    /// Upload a picked folder, recreating its directory structure under
    /// `folder`. Each directory is created once per batch.
    pub async fn upload_folder(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
        entries: &[FolderEntry],
        progress: Option<Arc<UploadProgress>>,
        cancel: &CancellationToken,
    ) -> AppResult<UploadReport> {
        self.check_batch(&entries.iter().map(|e| &e.file).collect::<Vec<_>>())?;

        let mut report = UploadReport {
            session: new_upload_session(),
            ..UploadReport::default()
        };
        let mut created: HashMap<String, FolderId> = HashMap::new();

        for entry in entries {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let mut parent = folder;
            let mut path = String::new();
            for segment in entry.parent_path().split('/').filter(|s| !s.is_empty()) {
                if !path.is_empty() {
                    path.push('/');
                }
                path.push_str(segment);

                parent = match created.get(&path) {
                    Some(id) => Some(*id),
                    None => {
                        let new_folder = self
                            .folder_repo
                            .create(
                                &NewFolder {
                                    name: segment.to_string(),
                                    parent_id: parent,
                                    user_id: ctx.user_id,
                                    owner_id: ctx.user_id,
                                    upload_session: Some(report.session.clone()),
                                },
                                ctx.token(),
                            )
                            .await?;
                        created.insert(path.clone(), new_folder.id);
                        let id = new_folder.id;
                        report.folders.push(new_folder);
                        Some(id)
                    }
                };
            }

            let record = self
                .upload_local(ctx, parent, &entry.file, &report.session, progress.as_ref())
                .await?;
            report.files.push(record);
        }

        self.log_report(ctx, folder, &report);
        Ok(report)
    }

    async fn upload_local(
        &self,
        ctx: &SessionContext,
        folder: Option<FolderId>,
        file: &LocalFile,
        session: &str,
        progress: Option<&Arc<UploadProgress>>,
    ) -> AppResult<FileRecord> {
        let data = read_local(file).await?;
        if data.len() as u64 != file.size {
            warn!(file = %file.name, "File changed size since it was collected");
        }
        if let Some(tracker) = progress {
            tracker.start_file(&file.name);
        }
        self.upload_bytes(
            ctx,
            folder,
            &file.name,
            data,
            Some(session),
            progress.map(|t| t.callback()),
        )
        .await
    }

    fn log_report(&self, ctx: &SessionContext, folder: Option<FolderId>, report: &UploadReport) {
        if report.cancelled {
            warn!(
                user_id = %ctx.user_id,
                session = %report.session,
                uploaded = report.files.len(),
                "Upload cancelled"
            );
        } else {
            info!(
                user_id = %ctx.user_id,
                folder_id = ?folder,
                session = %report.session,
                files = report.files.len(),
                folders = report.folders.len(),
                "Upload finished"
            );
        }
    }
}
