//! Auth endpoints (`/auth/v1`).

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::traits::AuthProvider;
use nexo_core::types::{AuthSession, AuthUser, SignUp, UserId};

use super::client::RestClient;

/// Message the auth service returns when the email is taken.
pub const ALREADY_REGISTERED: &str = "User already registered";

/// Auth provider backed by the hosted auth service.
#[derive(Debug, Clone)]
pub struct RestAuthProvider {
    client: RestClient,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for AuthUser {
    fn from(body: UserBody) -> Self {
        AuthUser {
            id: body.id,
            email: body.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserBody,
}

impl TokenBody {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign-up answers with a session when email confirmation is disabled and
/// with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(TokenBody),
    User(UserBody),
}

impl RestAuthProvider {
    /// Create a new auth provider.
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> AppResult<AuthSession> {
        let mut url = self.client.endpoint(["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let token: TokenBody = self
            .client
            .send_json(self.client.request(Method::POST, url, None).json(&body))
            .await?;
        Ok(token.into_session(Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUp> {
        let url = self.client.endpoint(["auth", "v1", "signup"])?;
        let request = self
            .client
            .request(Method::POST, url, None)
            .json(&json!({ "email": email, "password": password }));

        let body: SignUpBody = self.client.send_json(request).await.map_err(|e| {
            if e.message == ALREADY_REGISTERED {
                AppError::new(ErrorKind::Conflict, e.message)
            } else {
                e
            }
        })?;

        let signed_up = match body {
            SignUpBody::Session(token) => {
                let session = token.into_session(Utc::now());
                SignUp {
                    user: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpBody::User(user) => SignUp {
                user: user.into(),
                session: None,
            },
        };
        info!(
            user_id = %signed_up.user.id,
            confirmed = signed_up.session.is_some(),
            "Account created"
        );
        Ok(signed_up)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let url = self.client.endpoint(["auth", "v1", "logout"])?;
        self.client
            .send(self.client.request(Method::POST, url, Some(access_token)))
            .await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<AuthUser> {
        let url = self.client.endpoint(["auth", "v1", "user"])?;
        let user: UserBody = self
            .client
            .send_json(self.client.request(Method::GET, url, Some(access_token)))
            .await?;
        Ok(user.into())
    }
}
