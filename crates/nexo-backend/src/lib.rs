//! # nexo-backend
//!
//! Clients for the hosted backend-as-a-service (auth, record tables, object
//! storage), an in-memory stand-in with the same behavior, and typed
//! repositories for the `users`, `folders` and `files` tables.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod rest;

pub use connection::Backend;
pub use memory::{MEMORY_ANON_KEY, MemoryBackend};
