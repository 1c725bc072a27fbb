use videohint_core::error::CoreError;
use videohint_core::storage::{validate_backend_config, StorageBackendType};

/// Failure to build a [`WorkerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] CoreError),
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Postgres connection string for the `bot` table.
    pub database_url: String,
    /// Which object storage backend label files are read from.
    pub storage_backend: StorageBackendType,
    /// Backend config object, validated for `storage_backend`.
    pub storage_config: serde_json::Value,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight invocations (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Logs a warning at startup; changes nothing else.
    pub test_mode: bool,
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default       |
    /// |-------------------------|---------------|
    /// | `HOST`                  | `0.0.0.0`     |
    /// | `PORT`                  | `3000`        |
    /// | `DATABASE_URL`          | required      |
    /// | `STORAGE_BACKEND`       | `local`       |
    /// | `STORAGE_BASE_PATH`     | `./storage`   |
    /// | `S3_REGION`             | `AWS_REGION`  |
    /// | `S3_ENDPOINT`           | unset         |
    /// | `S3_FORCE_PATH_STYLE`   | `false`       |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`          |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`          |
    /// | `IS_TEST_MODE`          | `false`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", lookup("PORT"), 3000)?;
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let storage_backend = StorageBackendType::from_name(
            lookup("STORAGE_BACKEND").as_deref().unwrap_or("local"),
        )?;
        let storage_config = match storage_backend {
            StorageBackendType::Local => serde_json::json!({
                "base_path": lookup("STORAGE_BASE_PATH").unwrap_or_else(|| "./storage".into()),
            }),
            StorageBackendType::S3 => {
                let mut config = serde_json::json!({
                    "force_path_style": parse_bool("S3_FORCE_PATH_STYLE", lookup("S3_FORCE_PATH_STYLE"))?,
                });
                if let Some(region) = lookup("S3_REGION").or_else(|| lookup("AWS_REGION")) {
                    config["region"] = region.into();
                }
                if let Some(endpoint) = lookup("S3_ENDPOINT") {
                    config["endpoint"] = endpoint.into();
                }
                config
            }
        };
        validate_backend_config(storage_backend, &storage_config)?;

        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", lookup("REQUEST_TIMEOUT_SECS"), 30)?;
        let shutdown_timeout_secs =
            parse_or("SHUTDOWN_TIMEOUT_SECS", lookup("SHUTDOWN_TIMEOUT_SECS"), 30)?;
        let test_mode = parse_bool("IS_TEST_MODE", lookup("IS_TEST_MODE"))?;

        Ok(Self {
            host,
            port,
            database_url,
            storage_backend,
            storage_config,
            request_timeout_secs,
            shutdown_timeout_secs,
            test_mode,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}

/// Unset or empty is `false`.
fn parse_bool(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::Invalid {
            name,
            value: v.to_string(),
        }),
    }
}
