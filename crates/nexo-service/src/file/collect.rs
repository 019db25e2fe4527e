//! Local file collection for uploads.
//!
//! Drop-style collection flattens directories into their files and skips
//! oversized ones. Folder collection keeps every file's path relative to
//! the picked directory, including the directory's own name.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;

/// A local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFile {
    /// File name (last path component).
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Size in bytes when collected.
    pub size: u64,
}

impl LocalFile {
    /// Stat a single file.
    pub fn from_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Cannot read {}: {e}", path.display()),
                e,
            )
        })?;
        if !metadata.is_file() {
            return Err(AppError::validation(format!(
                "{} is not a file",
                path.display()
            )));
        }
        Ok(Self {
            name: file_name(&path),
            size: metadata.len(),
            path,
        })
    }
}

/// A file inside a picked folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    /// `/`-separated path starting with the picked folder's name.
    pub relative_path: String,
    /// The file itself.
    pub file: LocalFile,
}

impl FolderEntry {
    /// Directory part of the relative path (`""` for none).
    pub fn parent_path(&self) -> &str {
        match self.relative_path.rfind('/') {
            Some(idx) => &self.relative_path[..idx],
            None => "",
        }
    }
}

/// Result of a drop-style collection.
#[derive(Debug, Clone, Default)]
pub struct DroppedFiles {
    /// Files accepted for upload.
    pub files: Vec<LocalFile>,
    /// Files skipped for exceeding the size limit.
    pub oversized: Vec<LocalFile>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn walk_error(err: walkdir::Error) -> AppError {
    let message = format!("Failed to read dropped entry: {err}");
    AppError::with_source(ErrorKind::Storage, message, err)
}

/// Whole megabytes, as shown in limit messages.
pub fn limit_in_mb(max_bytes: u64) -> u64 {
    max_bytes / (1024 * 1024)
}

/// Reject a picker batch when any file is over `max_bytes`.
///
/// Nothing is uploaded from a rejected batch.
pub fn check_batch_size(files: &[&LocalFile], max_bytes: u64) -> AppResult<()> {
    let oversized: Vec<_> = files.iter().filter(|f| f.size > max_bytes).collect();
    let limit = limit_in_mb(max_bytes);
    match oversized.as_slice() {
        [] => Ok(()),
        [single] => Err(AppError::validation(format!(
            "File {} exceeds the {limit} MB limit",
            single.name
        ))),
        many => Err(AppError::validation(format!(
            "{} files exceed the {limit} MB limit",
            many.len()
        ))),
    }
}

/// Flatten dropped files and directories into the files they contain.
///
/// Oversized files are skipped with a warning each; the rest are kept.
pub fn collect_dropped(paths: &[PathBuf], max_bytes: u64) -> AppResult<DroppedFiles> {
    let mut collected = DroppedFiles::default();

    for root in paths {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let size = entry.metadata().map_err(walk_error)?.len();
            let file = LocalFile {
                name: file_name(entry.path()),
                path: entry.into_path(),
                size,
            };
            if file.size > max_bytes {
                warn!(
                    file = %file.name,
                    size = file.size,
                    "File {} exceeds the {} MB limit",
                    file.name,
                    limit_in_mb(max_bytes)
                );
                collected.oversized.push(file);
            } else {
                collected.files.push(file);
            }
        }
    }

    Ok(collected)
}

/// Every file under `dir`, with paths relative to the directory's parent.
pub fn collect_folder(dir: &Path) -> AppResult<Vec<FolderEntry>> {
    if !dir.is_dir() {
        return Err(AppError::validation(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    // `.` and `..` have no name of their own.
    let dir = dir.canonicalize()?;
    let root_name = file_name(&dir);
    let mut entries = Vec::new();

    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&dir)
            .map_err(|_| AppError::internal("Walked entry outside its root"))?;
        let mut parts = vec![root_name.clone()];
        parts.extend(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );

        let size = entry.metadata().map_err(walk_error)?.len();
        entries.push(FolderEntry {
            relative_path: parts.join("/"),
            file: LocalFile {
                name: file_name(entry.path()),
                path: entry.into_path(),
                size,
            },
        });
    }

    Ok(entries)
}
