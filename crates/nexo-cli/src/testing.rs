//! Shared fixtures for unit tests.

use nexo_backend::{Backend, MemoryBackend};
use nexo_core::config::AppConfig;
use nexo_service::{RegisterRequest, SessionContext};

use crate::context::CliContext;
use crate::output::OutputFormat;
use crate::session::SessionStore;

/// A CLI context over a fresh in-memory backend with `ana@example.com`
/// registered and signed in. The session file lives in the returned dir.
pub(crate) async fn fixture() -> (CliContext, SessionContext, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let cli = CliContext::with_backend(
        &Backend::memory(MemoryBackend::default()),
        AppConfig::default(),
        SessionStore::new(dir.path().join("session.json")),
        OutputFormat::Table,
    );
    cli.services
        .auth
        .register(RegisterRequest {
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            admin_password: None,
        })
        .await
        .unwrap();
    let session = cli
        .services
        .auth
        .login("ana@example.com", "hunter22")
        .await
        .unwrap();
    (cli, SessionContext::from_session(&session), dir)
}
