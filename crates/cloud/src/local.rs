//! Filesystem-backed object storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use videohint_core::storage::{ObjectStorage, StorageError};

/// Config object for the `local` backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalSettings {
    pub base_path: PathBuf,
}

/// Objects are stored at `<base_path>/<bucket>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve `(bucket, name)` to a path under the base directory.
    ///
    /// Only plain relative components are accepted, so a key can never
    /// escape `base_path`.
    fn object_path(&self, bucket: &str, name: &str) -> Result<PathBuf, StorageError> {
        for key in [bucket, name] {
            let path = Path::new(key);
            let plain = !key.is_empty()
                && path
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)));
            if !plain {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
        }
        Ok(self.base_path.join(bucket).join(name))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn download(&self, bucket: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, name)?;
        tracing::debug!(path = %path.display(), "Reading object from local storage");

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                name: name.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }
}
