//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Registration and credential rules enforced on the client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Administrative password required before a new account can be
    /// registered. Registration is open when unset.
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            password_min_length: default_password_min(),
        }
    }
}

fn default_password_min() -> usize {
    6
}
