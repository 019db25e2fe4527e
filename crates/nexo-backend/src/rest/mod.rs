//! Clients for the hosted backend's REST surfaces.
//!
//! All three share one [`RestClient`] (connection pool, base URL and the
//! project's anonymous key).

pub mod auth;
pub mod client;
pub mod records;
pub mod storage;

pub use auth::RestAuthProvider;
pub use client::RestClient;
pub use records::RestRecordStore;
pub use storage::RestObjectStore;
