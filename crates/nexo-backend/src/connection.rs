//! Backend bundle wiring the three hosted services together.

use std::sync::Arc;

use tracing::info;

use nexo_core::config::{BackendConfig, BackendProvider, UploadConfig};
use nexo_core::error::AppError;
use nexo_core::traits::{AuthProvider, ObjectStore, RecordStore};

use crate::memory::{MEMORY_ANON_KEY, MemoryBackend};
use crate::rest::{RestAuthProvider, RestClient, RestObjectStore, RestRecordStore};

/// The hosted services a client session talks to.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Credential and session management.
    pub auth: Arc<dyn AuthProvider>,
    /// Relational tables.
    pub records: Arc<dyn RecordStore>,
    /// File bodies.
    pub objects: Arc<dyn ObjectStore>,
    /// Public key sent as the bearer when no user session exists.
    pub anon_key: String,
}

impl Backend {
    /// Build the backend selected by configuration.
    pub fn connect(config: &BackendConfig, upload: &UploadConfig) -> Result<Self, AppError> {
        match config.provider {
            BackendProvider::Rest => {
                info!(url = %config.url, bucket = %config.bucket, "Using hosted REST backend");
                let client = RestClient::new(config)?;
                Ok(Self {
                    auth: Arc::new(RestAuthProvider::new(client.clone())),
                    records: Arc::new(RestRecordStore::new(client.clone())),
                    objects: Arc::new(
                        RestObjectStore::new(client, &config.bucket)
                            .with_chunk_size(upload.chunk_size_bytes),
                    ),
                    anon_key: config.anon_key.clone(),
                })
            }
            BackendProvider::Memory => {
                info!("Using in-memory backend; nothing persists after exit");
                Ok(Self::memory(MemoryBackend::new(&config.bucket)))
            }
        }
    }

    /// Wrap an in-memory backend (shared state behind every trait object).
    pub fn memory(backend: MemoryBackend) -> Self {
        Self {
            auth: Arc::new(backend.clone()),
            records: Arc::new(backend.clone()),
            objects: Arc::new(backend),
            anon_key: MEMORY_ANON_KEY.to_string(),
        }
    }
}
