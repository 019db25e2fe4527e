//! Authentication service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use nexo_backend::repositories::UserRepository;
use nexo_backend::rest::auth::ALREADY_REGISTERED;
use nexo_core::config::AuthConfig;
use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::traits::AuthProvider;
use nexo_core::types::AuthSession;
use nexo_entity::user::UserProfile;

use crate::context::SessionContext;

/// Registration form.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Sign-in email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
    /// Administrative password gating registration.
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Handles registration, login, logout and token refresh.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Hosted auth provider.
    auth: Arc<dyn AuthProvider>,
    /// Profile table.
    users: Arc<UserRepository>,
    /// Registration rules.
    config: AuthConfig,
    /// Bearer for the profile insert when sign-up returns no session.
    anon_key: String,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        users: Arc<UserRepository>,
        config: AuthConfig,
        anon_key: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            users,
            config,
            anon_key: anon_key.into(),
        }
    }

    /// Whether registration asks for the administrative password.
    pub fn requires_admin_password(&self) -> bool {
        self.config
            .admin_password
            .as_deref()
            .is_some_and(|p| !p.is_empty())
    }

    /// Check the administrative password alone, before the form is shown.
    pub fn verify_admin_password(&self, supplied: Option<&str>) -> AppResult<()> {
        match self.config.admin_password.as_deref() {
            Some(expected) if !expected.is_empty() && supplied != Some(expected) => {
                warn!("Registration attempted with a wrong admin password");
                Err(AppError::authorization("Invalid admin password"))
            }
            _ => Ok(()),
        }
    }

    /// Creates an account and its profile row. Does not leave a session behind.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserProfile> {
        let req = RegisterRequest {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            ..req
        };

        self.verify_admin_password(req.admin_password.as_deref())?;

        if req.password != req.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        if req.password.chars().count() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.config.password_min_length
            )));
        }
        req.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|list| list.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid registration data".to_string());
            AppError::with_source(ErrorKind::Validation, message, errors)
        })?;

        let signed_up = self
            .auth
            .sign_up(&req.email, &req.password)
            .await
            .map_err(|e| {
                if e.message == ALREADY_REGISTERED {
                    AppError::conflict("This email is already registered")
                } else {
                    e
                }
            })?;

        // Unconfirmed accounts have no session yet; the insert goes out as anon.
        let token = signed_up
            .session
            .as_ref()
            .map_or(self.anon_key.as_str(), |s| s.access_token.as_str());
        let profile = UserProfile {
            id: signed_up.user.id,
            email: req.email.clone(),
            username: req.username.clone(),
        };
        let created = self.users.create(&profile, token).await;
        if let Some(session) = &signed_up.session {
            if let Err(e) = self.auth.sign_out(&session.access_token).await {
                warn!(error = %e, "Failed to close the registration session");
            }
        }
        let created = created?;

        info!(user_id = %created.id, email = %created.email, "Account registered");
        Ok(created)
    }

    /// Signs in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session = self
            .auth
            .sign_in(email.trim(), password)
            .await
            .map_err(|e| {
                error!(error = %e, "Login failed");
                AppError::authentication("Invalid email or password")
            })?;
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Revokes the session.
    pub async fn logout(&self, session: &AuthSession) -> AppResult<()> {
        self.auth.sign_out(&session.access_token).await?;
        info!(user_id = %session.user.id, "Signed out");
        Ok(())
    }

    /// Exchanges the refresh token for a new session.
    pub async fn refresh(&self, session: &AuthSession) -> AppResult<AuthSession> {
        let refreshed = self.auth.refresh(&session.refresh_token).await?;
        info!(user_id = %refreshed.user.id, "Session refreshed");
        Ok(refreshed)
    }

    /// Loads the signed-in user's profile.
    ///
    /// Falls back to the auth email as username when no profile row exists.
    pub async fn current_user(&self, ctx: &SessionContext) -> AppResult<UserProfile> {
        let user = self.auth.get_user(ctx.token()).await?;
        let profile = self.users.find_by_id(user.id, ctx.token()).await?;
        Ok(profile.unwrap_or_else(|| {
            let email = user.email.unwrap_or_default();
            UserProfile {
                id: user.id,
                username: email.clone(),
                email,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexo_backend::{MEMORY_ANON_KEY, MemoryBackend};

    fn service(admin_password: Option<&str>) -> (AuthService, MemoryBackend) {
        service_over(MemoryBackend::default(), admin_password)
    }

    fn service_over(
        backend: MemoryBackend,
        admin_password: Option<&str>,
    ) -> (AuthService, MemoryBackend) {
        let records = Arc::new(backend.clone());
        let service = AuthService::new(
            Arc::new(backend.clone()),
            Arc::new(UserRepository::new(records)),
            AuthConfig {
                admin_password: admin_password.map(str::to_string),
                ..AuthConfig::default()
            },
            MEMORY_ANON_KEY,
        );
        (service, backend)
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            username: "Ana".into(),
            email: email.into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            admin_password: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_profile() {
        let (service, backend) = service(None);
        let profile = service.register(request(" ana@example.com ")).await.unwrap();
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(backend.rows("users").len(), 1);

        let session = service.login("ana@example.com", "hunter22").await.unwrap();
        let me = service
            .current_user(&SessionContext::from_session(&session))
            .await
            .unwrap();
        assert_eq!(me.username, "Ana");
    }

    #[tokio::test]
    async fn test_register_without_confirmation_session_keeps_profile() {
        let (service, backend) =
            service_over(MemoryBackend::with_email_confirmation("files"), None);
        let profile = service.register(request("ana@example.com")).await.unwrap();

        let rows = backend.rows("users");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], profile.id.to_string());
        assert_eq!(rows[0]["username"], "Ana");

        let err = service.login("ana@example.com", "hunter22").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        backend.confirm_email("ana@example.com");
        let session = service.login("ana@example.com", "hunter22").await.unwrap();
        let me = service
            .current_user(&SessionContext::from_session(&session))
            .await
            .unwrap();
        assert_eq!(me.username, "Ana");
    }

    #[tokio::test]
    async fn test_register_reuses_sign_up_session() {
        let (service, backend) = service(None);
        service.register(request("ana@example.com")).await.unwrap();
        // sign-up, profile insert, sign-out
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, _) = service(None);
        service.register(request("ana@example.com")).await.unwrap();
        let err = service.register(request("ana@example.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "This email is already registered");
    }

    #[tokio::test]
    async fn test_register_validates_form() {
        let (service, _) = service(None);

        let mut mismatch = request("ana@example.com");
        mismatch.confirm_password = "different".into();
        let err = service.register(mismatch).await.unwrap_err();
        assert_eq!(err.message, "Passwords do not match");

        let err = service.register(request("not-an-email")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid email address");

        let mut short = request("ana@example.com");
        short.password = "abc".into();
        short.confirm_password = "abc".into();
        let err = service.register(short).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_admin_password_gate() {
        let (service, _) = service(Some("letmein"));
        assert!(service.requires_admin_password());

        let err = service.register(request("ana@example.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let mut allowed = request("ana@example.com");
        allowed.admin_password = Some("letmein".into());
        assert!(service.register(allowed).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failure_is_generic() {
        let (service, _) = service(None);
        service.register(request("ana@example.com")).await.unwrap();
        let err = service.login("ana@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid email or password");
    }
}
