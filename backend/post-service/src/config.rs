/// Configuration management for Post Service
///
/// Loads configuration from environment variables.
use crate::domain::OutOfRangePolicy;
use anyhow::{anyhow, Context, Result};
use db_pool::env_utils::first_env_var;
use db_pool::DbConfig;
use std::str::FromStr;
use std::time::Duration;

pub const SERVICE_NAME: &str = "post-service";

/// Where posts and comments are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" | "pql" => Ok(StorageBackend::Postgres),
            other => Err(format!(
                "unknown storage backend '{}', expected 'memory' or 'postgres'",
                other
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Selected storage backend
    pub backend: StorageBackend,
    /// Pool settings, present only for the PostgreSQL backend
    pub database: Option<DbConfig>,
    /// Repository behaviour shared by all backends
    pub repository: RepositoryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Deadline per repository operation
    pub operation_timeout: Option<Duration>,
    /// Behaviour for pages past the last comment
    pub out_of_range: OutOfRangePolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let backend = match first_env_var(&["STORAGE_BACKEND"]) {
            Some(value) => StorageBackend::from_str(&value).map_err(|e| anyhow!(e))?,
            // Older deployments select PostgreSQL with ENV=pql and anything else means memory
            None => match std::env::var("ENV") {
                Ok(value) if value.trim().eq_ignore_ascii_case("pql") => StorageBackend::Postgres,
                _ => StorageBackend::Memory,
            },
        };

        let database = match backend {
            StorageBackend::Postgres => Some(
                DbConfig::from_env(SERVICE_NAME)
                    .map_err(|e| anyhow!(e))
                    .context("PostgreSQL backend selected but database is not configured")?,
            ),
            StorageBackend::Memory => None,
        };

        let operation_timeout = match std::env::var("REPOSITORY_OPERATION_TIMEOUT_MS") {
            Ok(value) => {
                let ms: u64 = value.trim().parse().with_context(|| {
                    format!("invalid REPOSITORY_OPERATION_TIMEOUT_MS '{}'", value)
                })?;
                // 0 disables the deadline
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            Err(_) => None,
        };

        let out_of_range = match std::env::var("COMMENTS_OUT_OF_RANGE_POLICY") {
            Ok(value) => OutOfRangePolicy::from_str(&value).map_err(|e| anyhow!(e))?,
            Err(_) => OutOfRangePolicy::default(),
        };

        Ok(Config {
            env,
            backend,
            database,
            repository: RepositoryConfig {
                operation_timeout,
                out_of_range,
            },
        })
    }
}
