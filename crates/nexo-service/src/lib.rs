//! # nexo-service
//!
//! Use cases of the Nexo Drive client. Each service orchestrates the typed
//! repositories and the hosted auth and object-storage clients.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`Services`] wires the full
//! set from a [`nexo_backend::Backend`].

pub mod auth;
pub mod context;
pub mod file;
pub mod folder;
pub mod item;
pub mod services;

#[cfg(test)]
mod testing;

pub use auth::{AuthService, RegisterRequest};
pub use context::SessionContext;
pub use file::{FileService, UploadProgress, UploadService};
pub use folder::{FolderListing, FolderService, TreeService};
pub use item::ItemService;
pub use services::Services;
