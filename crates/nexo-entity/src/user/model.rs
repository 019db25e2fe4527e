//! User profile model.

use serde::{Deserialize, Serialize};

use nexo_core::types::UserId;

/// A row of the `users` table, created right after sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Same id as the auth account.
    pub id: UserId,
    /// Sign-in email.
    pub email: String,
    /// Display name entered at registration.
    pub username: String,
}

impl UserProfile {
    /// Table holding profile rows.
    pub const TABLE: &'static str = "users";
}
