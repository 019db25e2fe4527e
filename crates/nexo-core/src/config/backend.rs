//! Hosted backend configuration.

use serde::{Deserialize, Serialize};

/// Which backend implementation the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// The hosted backend's REST endpoints.
    #[default]
    Rest,
    /// A process-local backend (nothing survives the process).
    Memory,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend implementation.
    #[serde(default)]
    pub provider: BackendProvider,
    /// Project base URL, e.g. `https://xyz.example.co`.
    #[serde(default)]
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
    /// Object storage bucket holding uploaded file bodies.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_bucket() -> String {
    "files".to_string()
}

fn default_request_timeout() -> u64 {
    300
}
