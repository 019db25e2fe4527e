//! Row access against the hosted relational store.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::{Filter, Query};

/// Table-level CRUD against the hosted store.
///
/// Rows travel as JSON objects; typed repositories in `nexo-backend`
/// convert them to entities. Every call is a single round trip and carries
/// the caller's access token so row-level policies apply server-side.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Select rows matching the query.
    async fn select(&self, table: &str, query: &Query, token: &str) -> AppResult<Vec<Value>>;

    /// Insert one row and return it as stored (with generated columns).
    async fn insert(&self, table: &str, row: Value, token: &str) -> AppResult<Value>;

    /// Apply `patch` to every row matching `filter`. Returns the number of rows changed.
    async fn update(&self, table: &str, filter: &Filter, patch: Value, token: &str)
    -> AppResult<u64>;

    /// Delete every row matching `filter`. Returns the number of rows removed.
    async fn delete(&self, table: &str, filter: &Filter, token: &str) -> AppResult<u64>;
}
