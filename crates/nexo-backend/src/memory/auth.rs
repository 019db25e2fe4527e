//! Auth provider half of the in-memory backend.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::traits::AuthProvider;
use nexo_core::types::{AuthSession, AuthUser, SignUp, UserId};

use super::{Account, MemoryBackend};
use crate::rest::auth::ALREADY_REGISTERED;

const SESSION_TTL_SECONDS: i64 = 3600;

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::internal(format!("Salt generation failed: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "Password verification failed: {e}"
        ))),
    }
}

impl MemoryBackend {
    fn issue_session(&self, account: &Account) -> AuthSession {
        let access_token = Uuid::new_v4().simple().to_string();
        let refresh_token = Uuid::new_v4().simple().to_string();
        self.state.sessions.insert(access_token.clone(), account.id);
        self.state
            .refresh_tokens
            .insert(refresh_token.clone(), account.id);

        AuthSession {
            access_token,
            refresh_token,
            expires_at: Some(Utc::now() + Duration::seconds(SESSION_TTL_SECONDS)),
            user: AuthUser {
                id: account.id,
                email: Some(account.email.clone()),
            },
        }
    }

    fn account_by_id(&self, id: UserId) -> AppResult<Account> {
        self.state
            .accounts
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::authentication("User not found"))
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUp> {
        self.count_request();
        let key = email.trim().to_lowercase();
        if self.state.accounts.contains_key(&key) {
            return Err(AppError::conflict(ALREADY_REGISTERED));
        }

        let account = Account {
            id: UserId::new(),
            email: email.trim().to_string(),
            password_hash: hash_password(password)?,
            confirmed: !self.state.confirm_email,
        };
        let user = AuthUser {
            id: account.id,
            email: Some(account.email.clone()),
        };
        let session = account.confirmed.then(|| self.issue_session(&account));
        self.state.accounts.insert(key, account);
        Ok(SignUp { user, session })
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.count_request();
        let account = self
            .state
            .accounts
            .get(&email.trim().to_lowercase())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::authentication("Invalid login credentials"))?;

        if !verify_password(password, &account.password_hash)? {
            return Err(AppError::authentication("Invalid login credentials"));
        }
        if !account.confirmed {
            return Err(AppError::authentication("Email not confirmed"));
        }

        Ok(self.issue_session(&account))
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        self.count_request();
        let (_, user_id) = self
            .state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::authentication("Invalid Refresh Token"))?;
        let account = self.account_by_id(user_id)?;
        Ok(self.issue_session(&account))
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.count_request();
        let user_id = self.authorize(access_token)?;
        self.state.sessions.retain(|_, id| *id != user_id);
        self.state.refresh_tokens.retain(|_, id| *id != user_id);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<AuthUser> {
        self.count_request();
        let account = self.account_by_id(self.authorize(access_token)?)?;
        Ok(AuthUser {
            id: account.id,
            email: Some(account.email),
        })
    }
}
