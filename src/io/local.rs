//! Local filesystem implementation of `FileSource`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::FileSource;
use crate::error::IoError;

/// Serves files from a directory on the local filesystem.
///
/// Request paths are resolved relative to `root`. Absolute paths and any path
/// containing a `..` component are rejected with `IoError::InvalidPath`.
///
/// # Example
///
/// ```ignore
/// use plate_server::io::{FileSource, LocalFileSource};
///
/// let source = LocalFileSource::new("/data/plates");
/// let bytes = source.read("plate_1/A01_site1.tif").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
    identifier: String,
}

impl LocalFileSource {
    /// Create a new source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let identifier = format!("file://{}", root.display());
        Self { root, identifier }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path to a filesystem path under the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, IoError> {
        let relative = Path::new(path.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(IoError::InvalidPath(path.to_string()));
                }
            }
        }

        Ok(resolved)
    }
}

#[async_trait]
impl FileSource for LocalFileSource {
    async fn read(&self, path: &str) -> Result<Bytes, IoError> {
        let resolved = self.resolve(path)?;

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(IoError::NotFound(path.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IoError::NotFound(path.to_string()))
            }
            Err(e) => {
                return Err(IoError::Read {
                    path: path.to_string(),
                    message: e.to_string(),
                })
            }
        }

        tokio::fs::read(&resolved)
            .await
            .map(Bytes::from)
            .map_err(|e| match e.kind() {
                // Removed between the metadata check and the read
                ErrorKind::NotFound => IoError::NotFound(path.to_string()),
                _ => IoError::Read {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
