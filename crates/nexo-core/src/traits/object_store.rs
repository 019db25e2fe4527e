//! Object storage for uploaded file bodies.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Upload progress callback. Receives the number of bytes sent since the
/// previous call.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// A bucket in the hosted object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store `data` under `path`, reporting progress as the body is sent.
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
        token: &str,
        progress: Option<ProgressFn>,
    ) -> AppResult<()>;

    /// Public URL for the object at `path`. No request is made.
    fn public_url(&self, path: &str) -> String;

    /// Download the object behind a public URL.
    async fn fetch(&self, url: &str) -> AppResult<Bytes>;
}
