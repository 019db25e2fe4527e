//! # nexo-entity
//!
//! Row models for the hosted `users`, `folders` and `files` tables, plus the
//! small value types the services pass around (item references,
//! breadcrumbs). Every row derives `Serialize`/`Deserialize` and maps 1:1 to
//! the JSON the backend returns.

pub mod file;
pub mod folder;
pub mod item;
pub mod user;
