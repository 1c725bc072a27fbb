//! S3-compatible object storage.

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use serde::Deserialize;
use videohint_core::storage::{ObjectStorage, StorageError};

/// Config object for the `s3` backend.
///
/// Credentials come from the standard AWS provider chain.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    pub region: String,
    /// Custom endpoint for S3-compatible stores (e.g. MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

/// Reads objects with `GetObject`.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load shared AWS config and build a client for `settings`.
    pub async fn connect(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(settings.force_path_style)
            .build();

        tracing::info!(
            region = %settings.region,
            endpoint = settings.endpoint.as_deref().unwrap_or("default"),
            "S3 client created"
        );
        Self::new(Client::from_conf(config))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn download(&self, bucket: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                GetObjectError::NoSuchKey(_) => StorageError::NotFound {
                    bucket: bucket.to_string(),
                    name: name.to_string(),
                },
                other => StorageError::Backend(other.to_string()),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(body.into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings: S3Settings =
            serde_json::from_value(serde_json::json!({ "region": "eu-west-1" })).unwrap();
        assert_eq!(settings.region, "eu-west-1");
        assert!(settings.endpoint.is_none());
        assert!(!settings.force_path_style);
    }

    #[test]
    fn settings_with_custom_endpoint() {
        let settings: S3Settings = serde_json::from_value(serde_json::json!({
            "region": "us-east-1",
            "endpoint": "http://localhost:9000",
            "force_path_style": true
        }))
        .unwrap();
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(settings.force_path_style);
    }
}
