//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use nexo_backend::{Backend, MemoryBackend};
use nexo_core::config::AppConfig;
use nexo_service::{RegisterRequest, Services, SessionContext};

/// Test application context over the in-memory backend.
pub struct TestApp {
    /// Shared backend state, for direct row inspection.
    pub backend: MemoryBackend,
    /// All services.
    pub services: Services,
    /// Application config.
    pub config: AppConfig,
    /// Scratch directory for local files and the session file.
    pub dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application with default config.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with the given config.
    pub fn with_config(config: AppConfig) -> Self {
        let backend = MemoryBackend::new(&config.backend.bucket);
        let services = Services::new(&Backend::memory(backend.clone()), &config);
        Self {
            backend,
            services,
            config,
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Backend bundle sharing this app's state.
    pub fn backend_bundle(&self) -> Backend {
        Backend::memory(self.backend.clone())
    }

    /// Register an account with a fixed password.
    pub async fn register(&self, username: &str, email: &str) {
        self.services
            .auth
            .register(RegisterRequest {
                username: username.into(),
                email: email.into(),
                password: "password123".into(),
                confirm_password: "password123".into(),
                admin_password: self.config.auth.admin_password.clone(),
            })
            .await
            .expect("Failed to register test user");
    }

    /// Register and sign in; returns the service context.
    pub async fn create_test_user(&self, username: &str, email: &str) -> SessionContext {
        self.register(username, email).await;
        let session = self
            .services
            .auth
            .login(email, "password123")
            .await
            .expect("Failed to log in test user");
        SessionContext::from_session(&session)
    }

    /// Write a local file under the scratch dir and return its path.
    pub fn write_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Scratch dir path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Names in a backend table, sorted.
    pub fn names(&self, table: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .backend
            .rows(table)
            .iter()
            .filter_map(|row| row["name"].as_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}
