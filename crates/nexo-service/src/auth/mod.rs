//! Account registration, login and session handling.

pub mod service;

pub use service::{AuthService, RegisterRequest};
