//! Authenticated user and session values returned by the auth provider.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The account as known to the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Account id, also the primary key of the `users` profile row.
    pub id: UserId,
    /// Sign-in email.
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for record and storage requests.
    pub access_token: String,
    /// Token exchanged for a new session once the access token expires.
    pub refresh_token: String,
    /// When the access token stops being accepted.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// The signed-in account.
    pub user: AuthUser,
}

/// Outcome of a sign-up.
///
/// The hosted auth service hands back a session right away when email
/// confirmation is off; otherwise only the account exists until the
/// address is confirmed.
#[derive(Debug, Clone)]
pub struct SignUp {
    /// The created account.
    pub user: AuthUser,
    /// Session for the new account, if one was issued.
    pub session: Option<AuthSession>,
}

impl AuthSession {
    /// Whether the access token is expired (or expires within `leeway`).
    pub fn is_expired(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now + leeway >= expires_at,
            None => false,
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}
