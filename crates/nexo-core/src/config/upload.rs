//! Upload configuration.

use serde::{Deserialize, Serialize};

/// Upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file in bytes (default 50 MB, the bucket's limit).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Size of the body chunks streamed to object storage; progress is
    /// reported once per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            chunk_size_bytes: default_chunk_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    52_428_800 // 50 MB
}

fn default_chunk_size() -> usize {
    262_144 // 256 KB
}
