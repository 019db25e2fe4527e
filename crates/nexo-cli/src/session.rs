//! Persisted sign-in state between `nexo` invocations.
//!
//! The tokens, the signed-in user and the current folder are kept as one
//! JSON document, by default at `<config dir>/nexo-drive/session.json`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use nexo_core::config::{SessionConfig, app_config_dir};
use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::types::{AuthSession, FolderId};

/// What is kept on disk while signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Tokens and user.
    pub session: AuthSession,
    /// Current folder (`None` at the root).
    #[serde(default)]
    pub cwd: Option<FolderId>,
}

impl StoredSession {
    /// A fresh session positioned at the root.
    pub fn new(session: AuthSession) -> Self {
        Self { session, cwd: None }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

/// Default session file location.
pub fn default_session_path() -> PathBuf {
    app_config_dir().join("session.json")
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("Failed to {action} {}: {err}", path.display()),
        err,
    )
}

impl SessionStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path, or the default one.
    pub fn from_config(config: &SessionConfig) -> Self {
        match &config.file {
            Some(file) if !file.trim().is_empty() => Self::new(file),
            _ => Self::new(default_session_path()),
        }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file means signed out.
    pub fn load(&self) -> AppResult<Option<StoredSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read", &self.path, e)),
        };
        let stored = serde_json::from_str(&raw)?;
        Ok(Some(stored))
    }

    /// Write the session, creating parent directories as needed.
    ///
    /// The file holds bearer tokens, so on unix it is readable by the owner only.
    pub fn save(&self, stored: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
        }
        let json = serde_json::to_string_pretty(stored)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| io_error("write", &self.path, e))?;

        // A file left by an older run keeps its mode on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| io_error("write", &self.path, e))?;
        }
        file.write_all(json.as_bytes())
            .map_err(|e| io_error("write", &self.path, e))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Forget the session. Succeeds when there is nothing to remove.
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexo_core::types::{AuthUser, UserId};

    fn stored() -> StoredSession {
        StoredSession {
            session: AuthSession {
                access_token: "access".into(),
                refresh_token: "refresh".into(),
                expires_at: None,
                user: AuthUser {
                    id: UserId::new(),
                    email: Some("ana@example.com".into()),
                },
            },
            cwd: Some(FolderId::new()),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));
        assert!(store.load().unwrap().is_none());

        let original = stored();
        store.save(&original).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.cwd, original.cwd);
        assert_eq!(loaded.session.user, original.session.user);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(&path);
        store.save(&stored()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_configured_path_wins() {
        let config = SessionConfig {
            file: Some("/tmp/nexo-test/session.json".into()),
        };
        assert_eq!(
            SessionStore::from_config(&config).path(),
            Path::new("/tmp/nexo-test/session.json")
        );
        assert!(
            SessionStore::from_config(&SessionConfig::default())
                .path()
                .ends_with("nexo-drive/session.json")
        );
    }
}
