//! Local session persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the signed-in session is kept between invocations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Session file path. Defaults to `<config dir>/nexo-drive/session.json`.
    #[serde(default)]
    pub file: Option<String>,
}
