use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::path::PathBuf;

/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Where uploads live on disk and how they are addressed publicly.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory files are written to (`UPLOADS_DIR`)
    pub dir: PathBuf,
    /// Public origin prefixed to relative asset paths (`BASE_URL`)
    pub base_url: String,
    /// Largest accepted request body for `POST /upload`
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl FromEnv for UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            env_or_default("UPLOADS_DIR", "uploads"),
            env_or_default("BASE_URL", "http://localhost:8080"),
        )
        .with_max_bytes(env_parse_or("UPLOAD_MAX_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?))
    }
}
