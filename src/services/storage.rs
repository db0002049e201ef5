use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::config::CONFIG;
use crate::error::{AppError, Result};

/// Filesystem-backed storage for uploaded media files.
///
/// Stored names are always generated server-side, so paths handed to
/// [`MediaStorage::save`] and [`MediaStorage::remove`] never contain
/// client-controlled separators.
#[derive(Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk path of a stored file.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Public URL of a stored file, built from the configured base URL.
    pub fn url_of(&self, filename: &str) -> String {
        format!(
            "{}/uploads/{}",
            CONFIG.server.public_url.trim_end_matches('/'),
            filename
        )
    }

    /// Generate a collision-resistant stored filename, keeping a sanitized
    /// lowercase version of the original extension.
    pub fn generate_filename(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| {
                !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric())
            });

        let stem = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        );

        match ext {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    /// Write an uploaded file to disk, returning its storage path.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.path_of(filename);
        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.path_of(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
