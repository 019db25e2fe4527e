//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod backend;
pub mod logging;
pub mod session;
pub mod upload;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::backend::{BackendConfig, BackendProvider};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration sources
/// (`config/default.toml`, an optional user file, and `NEXO__` environment
/// variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosted backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Upload limits and progress granularity.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Registration and credential rules.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Local session persistence.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-user directory for the config file and the stored session:
/// `<config dir>/nexo-drive`.
pub fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nexo-drive")
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), `<config dir>/nexo-drive/config.toml`
    /// (if present), the given file (required when provided), and environment
    /// variables prefixed with `NEXO__` (for example `NEXO__BACKEND__URL`).
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        Self::load_with(&app_config_dir().join("config.toml"), path)
    }

    fn load_with(user_file: &Path, path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::from(user_file).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("NEXO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.backend.provider == BackendProvider::Rest {
            if self.backend.url.trim().is_empty() {
                return Err(AppError::configuration(
                    "backend.url must be set (or NEXO__BACKEND__URL)",
                ));
            }
            if self.backend.anon_key.trim().is_empty() {
                return Err(AppError::configuration(
                    "backend.anon_key must be set (or NEXO__BACKEND__ANON_KEY)",
                ));
            }
        }

        if self.upload.chunk_size_bytes == 0 {
            return Err(AppError::configuration(
                "upload.chunk_size_bytes must be greater than zero",
            ));
        }

        Ok(())
    }
}
