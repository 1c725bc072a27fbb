//! Object storage seam: backend selection, config validation, and the
//! read-only [`ObjectStorage`] trait the pipeline downloads through.

use async_trait::async_trait;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure while reading an object.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{name}")]
    NotFound { bucket: String, name: String },

    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read access to an object store addressed by `(bucket, name)`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch the full contents of an object.
    async fn download(&self, bucket: &str, name: &str) -> Result<Vec<u8>, StorageError>;
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Supported storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendType {
    Local,
    S3,
}

impl StorageBackendType {
    /// Parse from the `STORAGE_BACKEND` configuration value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(CoreError::Validation(format!(
                "Unknown storage backend type '{other}'. Must be one of: local, s3"
            ))),
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "Local Filesystem",
            Self::S3 => "Amazon S3 / Compatible",
        }
    }

    /// Configuration name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

/// Validate that `config` contains the required keys for `backend_type`.
///
/// - `local`: requires `base_path` (string)
/// - `s3`: requires `region` (string); `endpoint` is optional
pub fn validate_backend_config(
    backend_type: StorageBackendType,
    config: &serde_json::Value,
) -> Result<(), CoreError> {
    let obj = config
        .as_object()
        .ok_or_else(|| CoreError::Validation("Backend config must be a JSON object".into()))?;

    match backend_type {
        StorageBackendType::Local => require_string_field(obj, "base_path", backend_type),
        StorageBackendType::S3 => require_string_field(obj, "region", backend_type),
    }
}

/// Helper: ensure an object has a non-empty string field.
fn require_string_field(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &str,
    backend_type: StorageBackendType,
) -> Result<(), CoreError> {
    match obj.get(field) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Backend type '{}' requires a non-empty string field '{field}' in config",
            backend_type.name()
        ))),
    }
}
