//! Hosted-backend traits defined in `nexo-core` and implemented in `nexo-backend`.

pub mod auth;
pub mod object_store;
pub mod record;

pub use auth::AuthProvider;
pub use object_store::{ObjectStore, ProgressFn};
pub use record::RecordStore;
