//! Everything a command needs: services, the session store and output settings.

use chrono::{Duration, Utc};
use tracing::info;

use nexo_backend::Backend;
use nexo_core::config::AppConfig;
use nexo_core::error::AppError;
use nexo_core::result::AppResult;
use nexo_service::{Services, SessionContext};

use crate::output::OutputFormat;
use crate::session::{SessionStore, StoredSession};

/// Refresh the access token when it expires within this many seconds.
const REFRESH_LEEWAY_SECONDS: i64 = 30;

/// Per-invocation command context.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// All use cases, wired against the configured backend.
    pub services: Services,
    /// Session persistence.
    pub store: SessionStore,
    /// Output format.
    pub format: OutputFormat,
    /// Loaded configuration.
    pub config: AppConfig,
}

impl CliContext {
    /// Connect to the configured backend.
    pub fn new(config: AppConfig, format: OutputFormat) -> AppResult<Self> {
        let backend = Backend::connect(&config.backend, &config.upload)?;
        let store = SessionStore::from_config(&config.session);
        Ok(Self::with_backend(&backend, config, store, format))
    }

    /// Build against an already-connected backend.
    pub fn with_backend(
        backend: &Backend,
        config: AppConfig,
        store: SessionStore,
        format: OutputFormat,
    ) -> Self {
        Self {
            services: Services::new(backend, &config),
            store,
            format,
            config,
        }
    }

    /// The stored session, refreshed first when its token is about to expire.
    pub async fn require_session(&self) -> AppResult<StoredSession> {
        let mut stored = self
            .store
            .load()?
            .ok_or_else(|| AppError::authentication("Not signed in. Run `nexo login` first."))?;

        if stored
            .session
            .is_expired(Utc::now(), Duration::seconds(REFRESH_LEEWAY_SECONDS))
        {
            stored.session = self.services.auth.refresh(&stored.session).await?;
            self.store.save(&stored)?;
            info!(user_id = %stored.session.user.id, "Access token refreshed");
        }

        Ok(stored)
    }

    /// Service context for a stored session.
    pub fn session_context(stored: &StoredSession) -> SessionContext {
        SessionContext::from_session(&stored.session)
    }
}
