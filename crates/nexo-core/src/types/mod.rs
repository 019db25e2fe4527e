//! Core type definitions used across the Nexo workspace.

pub mod filter;
pub mod id;
pub mod session;

pub use filter::{Filter, FilterField, FilterOp, FilterValue, Query, SortDirection};
pub use id::*;
pub use session::{AuthSession, AuthUser, SignUp};
