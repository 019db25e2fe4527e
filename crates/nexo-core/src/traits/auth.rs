//! Credential and session management provided by the hosted backend.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::session::{AuthSession, AuthUser, SignUp};

/// Account sign-up, sign-in and token exchange.
///
/// Token lifetimes and credential storage live inside the provider; the
/// client only carries the tokens it is handed.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Create an account. Fails with a `Conflict` when the email is taken.
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUp>;

    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    /// Resolve the account behind `access_token`.
    async fn get_user(&self, access_token: &str) -> AppResult<AuthUser>;
}
