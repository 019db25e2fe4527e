//! Session context carrying the signed-in user and their access token.

use nexo_core::types::{AuthSession, UserId};

/// Context for the signed-in user.
///
/// Built from the active [`AuthSession`] and passed into every service
/// method so that each operation knows *who* is acting and which token the
/// backend should authorize.
#[derive(Clone)]
pub struct SessionContext {
    /// The signed-in user's ID.
    pub user_id: UserId,
    /// The signed-in user's email, when the provider returned one.
    pub email: Option<String>,
    /// Bearer token for record and storage requests.
    pub access_token: String,
}

impl SessionContext {
    /// Creates a context from an auth session.
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            user_id: session.user.id,
            email: session.user.email.clone(),
            access_token: session.access_token.clone(),
        }
    }

    /// The access token as a borrowed string.
    pub fn token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
