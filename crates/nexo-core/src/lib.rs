//! # nexo-core
//!
//! Core crate for Nexo Drive. Contains the hosted-backend traits,
//! configuration schemas, typed identifiers, query filters, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Nexo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
