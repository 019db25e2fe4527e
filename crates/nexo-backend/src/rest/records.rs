//! Record tables (`/rest/v1/{table}`).

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::debug;

use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{Filter, Query};

use super::client::RestClient;

/// Record store backed by the hosted REST table API.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    client: RestClient,
}

impl RestRecordStore {
    /// Create a new record store.
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    fn table_url(&self, table: &str, pairs: &[(String, String)]) -> AppResult<Url> {
        let mut url = self.client.endpoint(["rest", "v1", table])?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Unfiltered writes would touch every row the caller can see.
fn require_filter(table: &str, filter: &Filter, action: &str) -> AppResult<()> {
    if filter.is_empty() {
        return Err(AppError::validation(format!(
            "Refusing to {action} every row of '{table}'"
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn select(&self, table: &str, query: &Query, token: &str) -> AppResult<Vec<Value>> {
        let url = self.table_url(table, &query.to_query_pairs())?;
        debug!(table, url = %url, "Selecting rows");
        self.client
            .send_json(self.client.request(Method::GET, url, Some(token)))
            .await
    }

    async fn insert(&self, table: &str, row: Value, token: &str) -> AppResult<Value> {
        let url = self.table_url(table, &[])?;
        let rows: Vec<Value> = self
            .client
            .send_json(
                self.client
                    .request(Method::POST, url, Some(token))
                    .header("Prefer", "return=representation")
                    .json(&row),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::backend(format!("Insert into '{table}' returned no row")))
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Value,
        token: &str,
    ) -> AppResult<u64> {
        require_filter(table, filter, "update")?;
        let url = self.table_url(table, &filter.to_query_pairs())?;
        let rows: Vec<Value> = self
            .client
            .send_json(
                self.client
                    .request(Method::PATCH, url, Some(token))
                    .header("Prefer", "return=representation")
                    .json(&patch),
            )
            .await?;
        Ok(rows.len() as u64)
    }

    async fn delete(&self, table: &str, filter: &Filter, token: &str) -> AppResult<u64> {
        require_filter(table, filter, "delete")?;
        let url = self.table_url(table, &filter.to_query_pairs())?;
        let rows: Vec<Value> = self
            .client
            .send_json(
                self.client
                    .request(Method::DELETE, url, Some(token))
                    .header("Prefer", "return=representation"),
            )
            .await?;
        Ok(rows.len() as u64)
    }
}
