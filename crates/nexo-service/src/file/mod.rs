//! File mutation, retrieval and uploads.

pub mod collect;
pub mod progress;
pub mod service;
pub mod upload;

pub use collect::{DroppedFiles, FolderEntry, LocalFile, collect_dropped, collect_folder};
pub use progress::{ProgressListener, ProgressSnapshot, UploadProgress};
pub use service::FileService;
pub use upload::{UploadReport, UploadService};
