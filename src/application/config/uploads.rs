use std::env;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadsConfig {
    /// Local directory uploaded files are written to.
    pub dir: String,
    /// Hard cap on multipart upload body size.
    pub max_upload_bytes: usize,
}

impl UploadsConfig {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("SITEKIT_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes: env::var("SITEKIT_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
