//! Object store half of the in-memory backend.

use async_trait::async_trait;
use bytes::Bytes;

use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_core::traits::{ObjectStore, ProgressFn};

use super::MemoryBackend;

/// Granularity of progress callbacks during an in-memory upload.
const PROGRESS_STEP: usize = 64 * 1024;

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        _content_type: &str,
        token: &str,
        progress: Option<ProgressFn>,
    ) -> AppResult<()> {
        self.count_request();
        self.admit(token)?;

        let url = self.public_url(path);
        if self.state.objects.contains_key(&url) {
            return Err(AppError::conflict("The resource already exists"));
        }

        if let Some(progress) = progress {
            for chunk in data.chunks(PROGRESS_STEP) {
                progress(chunk.len() as u64);
                tokio::task::yield_now().await;
            }
        }

        self.state.objects.insert(url, data);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}/{}", self.state.bucket, path.trim_start_matches('/'))
    }

    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        self.count_request();
        self.object(url)
            .ok_or_else(|| AppError::not_found("Object not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use nexo_core::error::ErrorKind;
    use nexo_core::traits::AuthProvider;

    #[tokio::test]
    async fn test_upload_reports_progress_and_fetches() {
        let backend = MemoryBackend::new("files");
        backend.sign_up("ana@example.com", "hunter22").await.unwrap();
        let session = backend.sign_in("ana@example.com", "hunter22").await.unwrap();

        let sent = Arc::new(AtomicU64::new(0));
        let counter = sent.clone();
        let progress: ProgressFn = Arc::new(move |n| {
            counter.fetch_add(n, Ordering::SeqCst);
        });

        let body = Bytes::from(vec![7u8; 150 * 1024]);
        backend
            .upload("u/a.bin", body.clone(), "application/octet-stream", &session.access_token, Some(progress))
            .await
            .unwrap();

        assert_eq!(sent.load(Ordering::SeqCst), body.len() as u64);
        let url = backend.public_url("u/a.bin");
        assert_eq!(url, "memory://files/u/a.bin");
        assert_eq!(backend.fetch(&url).await.unwrap(), body);

        let err = backend
            .upload("u/a.bin", body, "application/octet-stream", &session.access_token, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
