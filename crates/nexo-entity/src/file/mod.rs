//! File domain entities.

pub mod model;
pub mod name;
pub mod size;

pub use model::{FileRecord, NewFileRecord};
pub use name::{rename_preserving_extension, split_extension};
pub use size::format_file_size;
