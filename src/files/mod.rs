mod local;

pub use local::LocalProvider;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("File not found: {0}")]
    NotFound(String),
}

/// Filesystem stats for a stored file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats {
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Descriptive metadata for a stored file.
///
/// `original_filename` is `None` when the provider cannot recover the name
/// the file was uploaded under; callers fall back to the requested name.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub url: String,
    pub filename: String,
    pub original_filename: Option<String>,
    pub mimetype: String,
}

/// Abstraction over file metadata backends.
/// Lookups are keyed by stored file name; content and metadata reads only.
#[async_trait]
pub trait FileProvider: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, FileProviderError>;
    async fn stats(&self, name: &str) -> Result<Option<FileStats>, FileProviderError>;
    async fn info(&self, base_url: &str, name: &str) -> Result<FileInfo, FileProviderError>;
    async fn read(&self, name: &str) -> Result<bytes::Bytes, FileProviderError>;
}
