//! Object storage backends for reading label-detection results.
//!
//! - [`LocalStorage`]: `<base_path>/<bucket>/<name>` on the local filesystem.
//! - [`S3Storage`]: any S3-compatible endpoint via `aws-sdk-s3`.
//!
//! [`build_storage`] selects and constructs a backend from its JSON config.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use videohint_core::error::CoreError;
use videohint_core::storage::{validate_backend_config, ObjectStorage, StorageBackendType};

pub mod local;
pub mod s3;

pub use local::{LocalSettings, LocalStorage};
pub use s3::{S3Settings, S3Storage};

/// Validate `config` for `backend` and construct the backend.
pub async fn build_storage(
    backend: StorageBackendType,
    config: &serde_json::Value,
) -> Result<Arc<dyn ObjectStorage>, CoreError> {
    validate_backend_config(backend, config)?;

    let storage: Arc<dyn ObjectStorage> = match backend {
        StorageBackendType::Local => {
            let settings: LocalSettings = settings_from(backend, config)?;
            Arc::new(LocalStorage::new(settings.base_path))
        }
        StorageBackendType::S3 => {
            let settings: S3Settings = settings_from(backend, config)?;
            Arc::new(S3Storage::connect(&settings).await)
        }
    };

    tracing::info!(backend = backend.label(), "Object storage configured");
    Ok(storage)
}

fn settings_from<T: DeserializeOwned>(
    backend: StorageBackendType,
    config: &serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(config.clone()).map_err(|e| {
        CoreError::Validation(format!(
            "Invalid config for backend type '{}': {e}",
            backend.name()
        ))
    })
}
