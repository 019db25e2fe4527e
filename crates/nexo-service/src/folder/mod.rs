//! Folder browsing, mutation and tree walks.

pub mod service;
pub mod tree;

pub use service::{DeleteSummary, FolderListing, FolderService};
pub use tree::TreeService;
