//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use nexo_backend::{Backend, MEMORY_ANON_KEY, MemoryBackend};
use nexo_core::config::AppConfig;
use nexo_core::result::AppResult;
use nexo_core::traits::RecordStore;
use nexo_core::types::{Filter, FolderId, Query};
use nexo_entity::file::FileRecord;

use crate::auth::RegisterRequest;
use crate::context::SessionContext;
use crate::services::Services;

fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.into(),
        email: email.into(),
        password: "hunter22".into(),
        confirm_password: "hunter22".into(),
        admin_password: None,
    }
}

/// Wraps a record store and logs each delete as `(table, filter)`, with the
/// filter in query-string form (`folder_id=eq.<id>`).
#[derive(Debug)]
pub(crate) struct RecordingStore {
    inner: Arc<dyn RecordStore>,
    deletes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub(crate) fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn select(&self, table: &str, query: &Query, token: &str) -> AppResult<Vec<Value>> {
        self.inner.select(table, query, token).await
    }

    async fn insert(&self, table: &str, row: Value, token: &str) -> AppResult<Value> {
        self.inner.insert(table, row, token).await
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Value,
        token: &str,
    ) -> AppResult<u64> {
        self.inner.update(table, filter, patch, token).await
    }

    async fn delete(&self, table: &str, filter: &Filter, token: &str) -> AppResult<u64> {
        let rendered = filter
            .to_query_pairs()
            .into_iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        self.deletes
            .lock()
            .unwrap()
            .push((table.to_string(), rendered));
        self.inner.delete(table, filter, token).await
    }
}

async fn sign_in_ana(services: &Services) -> SessionContext {
    services
        .auth
        .register(register_request("ana", "ana@example.com"))
        .await
        .unwrap();
    let session = services
        .auth
        .login("ana@example.com", "hunter22")
        .await
        .unwrap();
    SessionContext::from_session(&session)
}

/// Services over a fresh in-memory backend, signed in as `ana@example.com`.
pub(crate) async fn signed_in() -> (Services, SessionContext, MemoryBackend) {
    let backend = MemoryBackend::default();
    let services = Services::new(&Backend::memory(backend.clone()), &AppConfig::default());
    let ctx = sign_in_ana(&services).await;
    (services, ctx, backend)
}

/// Like [`signed_in`], with every record delete logged.
pub(crate) async fn signed_in_recording() -> (Services, SessionContext, Arc<RecordingStore>) {
    let backend = MemoryBackend::default();
    let recording = Arc::new(RecordingStore::new(Arc::new(backend.clone())));
    let bundle = Backend {
        auth: Arc::new(backend.clone()),
        records: recording.clone(),
        objects: Arc::new(backend),
        anon_key: MEMORY_ANON_KEY.to_string(),
    };
    let services = Services::new(&bundle, &AppConfig::default());
    let ctx = sign_in_ana(&services).await;
    (services, ctx, recording)
}

/// Register and sign in `bob@example.com` against the same backend.
pub(crate) async fn second_user(services: &Services) -> SessionContext {
    services
        .auth
        .register(register_request("bob", "bob@example.com"))
        .await
        .unwrap();
    let session = services
        .auth
        .login("bob@example.com", "hunter22")
        .await
        .unwrap();
    SessionContext::from_session(&session)
}

/// Upload a file whose body is its own name.
pub(crate) async fn store_file(
    services: &Services,
    ctx: &SessionContext,
    folder: Option<FolderId>,
    name: &str,
) -> FileRecord {
    services
        .uploads
        .upload_bytes(ctx, folder, name, Bytes::from(name.to_string()), None, None)
        .await
        .unwrap()
}
