//! Operations that apply to folders and files alike.

pub mod service;

pub use service::ItemService;
