//! Process-local backend with the hosted services' observable behavior.
//!
//! Tables are JSON rows in `DashMap`s, passwords are argon2 hashes, tokens
//! are opaque random strings and object bodies are kept by public URL.

mod auth;
mod objects;
mod records;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use serde_json::Value;

use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::types::UserId;

/// Key the in-memory backend accepts as the anonymous role on record and
/// object requests.
pub const MEMORY_ANON_KEY: &str = "memory-anon-key";

/// A registered account.
#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password_hash: String,
    confirmed: bool,
}

#[derive(Debug, Default)]
struct State {
    bucket: String,
    /// Sign-ups must confirm their email before signing in.
    confirm_email: bool,
    /// Keyed by lowercase email.
    accounts: DashMap<String, Account>,
    /// Access token → account id.
    sessions: DashMap<String, UserId>,
    /// Refresh token → account id.
    refresh_tokens: DashMap<String, UserId>,
    /// Table name → rows.
    tables: DashMap<String, Vec<Value>>,
    /// Public URL → body.
    objects: DashMap<String, Bytes>,
    /// Round trips served, across all three services.
    requests: AtomicU64,
}

/// In-memory implementation of every backend trait.
///
/// Clones share state, so one instance can back the auth, record and
/// object trait objects of a [`crate::Backend`].
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    state: Arc<State>,
}

impl MemoryBackend {
    /// Create an empty backend whose object store is named `bucket`.
    pub fn new(bucket: &str) -> Self {
        Self::build(bucket, false)
    }

    /// Like [`MemoryBackend::new`], but sign-up issues no session and sign-in
    /// fails until [`MemoryBackend::confirm_email`] is called.
    pub fn with_email_confirmation(bucket: &str) -> Self {
        Self::build(bucket, true)
    }

    fn build(bucket: &str, confirm_email: bool) -> Self {
        Self {
            state: Arc::new(State {
                bucket: bucket.to_string(),
                confirm_email,
                ..State::default()
            }),
        }
    }

    /// Mark the account behind `email` as confirmed.
    pub fn confirm_email(&self, email: &str) -> bool {
        match self.state.accounts.get_mut(&email.trim().to_lowercase()) {
            Some(mut account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Number of backend round trips served so far.
    pub fn request_count(&self) -> u64 {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Snapshot of every row in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .tables
            .get(table)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// Stored object body behind a public URL.
    pub fn object(&self, url: &str) -> Option<Bytes> {
        self.state.objects.get(url).map(|b| b.clone())
    }

    fn count_request(&self) {
        self.state.requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Resolve the account behind a user access token.
    fn authorize(&self, token: &str) -> AppResult<UserId> {
        self.state
            .sessions
            .get(token)
            .map(|id| *id)
            .ok_or_else(|| AppError::authentication("Invalid or expired token"))
    }

    /// Admit a record or object request made with a user token or the anon key.
    fn admit(&self, token: &str) -> AppResult<()> {
        if token == MEMORY_ANON_KEY {
            return Ok(());
        }
        self.authorize(token).map(|_| ())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("files")
    }
}
