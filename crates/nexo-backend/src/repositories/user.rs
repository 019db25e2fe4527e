//! User profile repository implementation.

use std::sync::Arc;

use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{Filter, Query, UserId};
use nexo_entity::user::UserProfile;

use super::{decode_row, decode_rows};

/// Repository for the `users` profile table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    records: Arc<dyn RecordStore>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Insert a profile row.
    pub async fn create(&self, profile: &UserProfile, token: &str) -> AppResult<UserProfile> {
        let row = self
            .records
            .insert(UserProfile::TABLE, serde_json::to_value(profile)?, token)
            .await?;
        decode_row(row, "user")
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: UserId, token: &str) -> AppResult<Option<UserProfile>> {
        let query = Query::filtered(Filter::new().eq("id", id));
        let rows = self.records.select(UserProfile::TABLE, &query, token).await?;
        Ok(decode_rows::<UserProfile>(rows, "user")?.into_iter().next())
    }

    /// Look up only the email of a user.
    pub async fn find_email(&self, id: UserId, token: &str) -> AppResult<Option<String>> {
        let query = Query::filtered(Filter::new().eq("id", id)).columns("email");
        let rows = self.records.select(UserProfile::TABLE, &query, token).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.get("email").and_then(|e| e.as_str()).map(str::to_string)))
    }
}
