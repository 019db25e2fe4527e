//! Folder domain entities.

pub mod breadcrumbs;
pub mod model;

pub use breadcrumbs::Breadcrumbs;
pub use model::{Folder, NewFolder};
