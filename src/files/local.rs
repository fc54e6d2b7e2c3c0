use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::{FileInfo, FileProvider, FileProviderError, FileStats};

/// Local filesystem metadata provider.
///
/// Stored names follow the `{upload-millis}-{original-name}` convention, so
/// the original filename can be recovered by stripping the numeric prefix.
pub struct LocalProvider {
    base_path: PathBuf,
}

impl LocalProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn file_path(&self, name: &str) -> Result<PathBuf, FileProviderError> {
        validate_name(name)?;
        Ok(self.base_path.join(name))
    }
}

/// Reject names that could escape the base directory.
fn validate_name(name: &str) -> Result<(), FileProviderError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".."
    {
        return Err(FileProviderError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Recover the original filename from a `{millis}-{original}` stored name.
fn original_from_stored(name: &str) -> Option<String> {
    let (prefix, rest) = name.split_once('-')?;
    if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) && !rest.is_empty() {
        Some(rest.to_string())
    } else {
        None
    }
}

#[async_trait]
impl FileProvider for LocalProvider {
    async fn exists(&self, name: &str) -> Result<bool, FileProviderError> {
        let path = self.file_path(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn stats(&self, name: &str) -> Result<Option<FileStats>, FileProviderError> {
        let path = self.file_path(name)?;
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let modified_at = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(FileStats {
            size: meta.len(),
            modified_at,
        }))
    }

    async fn info(&self, base_url: &str, name: &str) -> Result<FileInfo, FileProviderError> {
        validate_name(name)?;

        let mimetype = mime_guess::from_path(name)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(FileInfo {
            url: format!("{base_url}/files/{name}"),
            filename: name.to_string(),
            original_filename: original_from_stored(name),
            mimetype,
        })
    }

    async fn read(&self, name: &str) -> Result<Bytes, FileProviderError> {
        let path = self.file_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileProviderError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
