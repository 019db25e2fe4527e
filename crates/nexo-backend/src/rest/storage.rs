//! Object storage (`/storage/v1/object`).

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Method, Url};
use tracing::debug;

use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::traits::{ObjectStore, ProgressFn};

use super::client::RestClient;

/// Default body chunk size; progress is reported once per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Object store backed by one bucket of the hosted storage service.
#[derive(Debug, Clone)]
pub struct RestObjectStore {
    client: RestClient,
    bucket: String,
    chunk_size: usize,
}

impl RestObjectStore {
    /// Create a store for `bucket`.
    pub fn new(client: RestClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the body chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn object_url(&self, prefix: &[&str], path: &str) -> AppResult<Url> {
        let segments = prefix
            .iter()
            .copied()
            .chain(std::iter::once(self.bucket.as_str()))
            .chain(path.split('/').filter(|s| !s.is_empty()));
        self.client.endpoint(segments)
    }
}

/// Split `data` into chunks that report their length as they are polled
/// by the HTTP body writer.
fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress: Option<ProgressFn>,
) -> impl futures::Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let mut chunks = Vec::with_capacity(data.len() / chunk_size + 1);
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + chunk_size).min(data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }

    stream::iter(chunks.into_iter().map(move |chunk| {
        if let Some(progress) = &progress {
            progress(chunk.len() as u64);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    }))
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        token: &str,
        progress: Option<ProgressFn>,
    ) -> AppResult<()> {
        let url = self.object_url(&["storage", "v1", "object"], path)?;
        let size = data.len();
        debug!(path, size, "Uploading object");

        let request = self
            .client
            .request(Method::POST, url, Some(token))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, size)
            .header("x-upsert", "false")
            .header("cache-control", "max-age=3600")
            .body(Body::wrap_stream(progress_stream(
                data,
                self.chunk_size,
                progress,
            )));

        self.client.send(request).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        match self.object_url(&["storage", "v1", "object", "public"], path) {
            Ok(url) => url.to_string(),
            Err(_) => String::new(),
        }
    }

    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        let url = Url::parse(url).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, format!("Invalid file url: {e}"), e)
        })?;
        let response = self.client.send(self.client.get_public(url)).await?;
        response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Download interrupted: {e}"), e)
        })
    }
}
