//! Record store half of the in-memory backend.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{Filter, Query, SortDirection};

use super::MemoryBackend;

/// Fill the columns the hosted tables generate on insert.
fn apply_defaults(table: &str, row: &mut Map<String, Value>) {
    row.entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    if table != "users" {
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        row.entry("is_private").or_insert(Value::Bool(false));
    }
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

fn project(row: &Value, columns: Option<&str>) -> Value {
    match columns.map(str::trim) {
        None | Some("*") => row.clone(),
        Some(list) => {
            let mut out = Map::new();
            for column in list.split(',').map(str::trim) {
                if let Some(value) = row.get(column) {
                    out.insert(column.to_string(), value.clone());
                }
            }
            Value::Object(out)
        }
    }
}

fn require_filter(filter: &Filter, action: &str) -> AppResult<()> {
    if filter.is_empty() {
        return Err(AppError::validation(format!(
            "Refusing to {action} without a filter"
        )));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryBackend {
    async fn select(&self, table: &str, query: &Query, token: &str) -> AppResult<Vec<Value>> {
        self.count_request();
        self.admit(token)?;

        let mut rows: Vec<Value> = self
            .state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_cells(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        Ok(rows
            .iter()
            .map(|row| project(row, query.columns.as_deref()))
            .collect())
    }

    async fn insert(&self, table: &str, row: Value, token: &str) -> AppResult<Value> {
        self.count_request();
        self.admit(token)?;

        let Value::Object(mut fields) = row else {
            return Err(AppError::validation("Inserted row must be a JSON object"));
        };
        apply_defaults(table, &mut fields);
        let stored = Value::Object(fields);

        self.state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Value,
        token: &str,
    ) -> AppResult<u64> {
        self.count_request();
        self.admit(token)?;
        require_filter(filter, "update")?;

        let Value::Object(patch) = patch else {
            return Err(AppError::validation("Update patch must be a JSON object"));
        };

        let Some(mut rows) = self.state.tables.get_mut(table) else {
            return Ok(0);
        };
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| filter.matches(row)) {
            if let Value::Object(fields) = row {
                for (key, value) in &patch {
                    fields.insert(key.clone(), value.clone());
                }
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, table: &str, filter: &Filter, token: &str) -> AppResult<u64> {
        self.count_request();
        self.admit(token)?;
        require_filter(filter, "delete")?;

        let Some(mut rows) = self.state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexo_core::error::ErrorKind;
    use nexo_core::traits::AuthProvider;
    use serde_json::json;

    async fn signed_in() -> (MemoryBackend, String) {
        let backend = MemoryBackend::default();
        backend.sign_up("ana@example.com", "hunter22").await.unwrap();
        let session = backend.sign_in("ana@example.com", "hunter22").await.unwrap();
        (backend, session.access_token)
    }

    #[tokio::test]
    async fn test_insert_fills_generated_columns() {
        let (backend, token) = signed_in().await;
        let row = backend
            .insert("folders", json!({ "name": "Docs", "parent_id": null }), &token)
            .await
            .unwrap();
        assert!(row["id"].is_string());
        assert!(row["created_at"].is_string());
        assert_eq!(row["is_private"], json!(false));
    }

    #[tokio::test]
    async fn test_select_filters_and_orders() {
        let (backend, token) = signed_in().await;
        for name in ["b", "a", "c"] {
            backend
                .insert("folders", json!({ "name": name, "parent_id": null }), &token)
                .await
                .unwrap();
        }
        backend
            .insert("folders", json!({ "name": "nested", "parent_id": "x" }), &token)
            .await
            .unwrap();

        let query = Query::filtered(Filter::new().is_null("parent_id")).order_by("name");
        let rows = backend.select("folders", &query, &token).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_select_projects_columns() {
        let (backend, token) = signed_in().await;
        backend
            .insert("users", json!({ "email": "ana@example.com", "username": "ana" }), &token)
            .await
            .unwrap();
        let rows = backend
            .select("users", &Query::default().columns("email"), &token)
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({ "email": "ana@example.com" })]);
    }

    #[tokio::test]
    async fn test_update_and_delete_count_rows() {
        let (backend, token) = signed_in().await;
        let row = backend
            .insert("files", json!({ "name": "a.txt", "folder_id": null }), &token)
            .await
            .unwrap();
        let id = row["id"].as_str().unwrap().to_string();

        let filter = Filter::new().eq("id", &id);
        let changed = backend
            .update("files", &filter, json!({ "name": "b.txt" }), &token)
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(backend.rows("files")[0]["name"], json!("b.txt"));

        assert_eq!(backend.delete("files", &filter, &token).await.unwrap(), 1);
        assert!(backend.rows("files").is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unknown_token_and_empty_filter() {
        let (backend, token) = signed_in().await;
        let err = backend
            .select("files", &Query::default(), "bogus")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let err = backend.delete("files", &Filter::new(), &token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
