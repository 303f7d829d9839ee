//! Runtime configuration sourced from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;
use crate::domain::SchemaVariant;
use crate::OncolensError;

pub const ENDPOINT_ENV: &str = "ONCOLENS_ENDPOINT";
pub const DB_PATH_ENV: &str = "ONCOLENS_DB_PATH";
pub const SCHEMA_ENV: &str = "ONCOLENS_SCHEMA";
pub const TIMEOUT_ENV: &str = "ONCOLENS_TIMEOUT_SECS";
pub const LOG_MODE_ENV: &str = "ONCOLENS_LOG_MODE";
pub const LOG_FILE_ENV: &str = "ONCOLENS_LOG_FILE";
pub const SANITIZE_MAX_BYTES_ENV: &str = "ONCOLENS_SANITIZE_MAX_BYTES";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/predict";
const DEFAULT_DB_PATH: &str = "oncolens.db";
const DEFAULT_LOG_FILE: &str = "oncolens.log";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 600;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub db_path: PathBuf,
    pub schema: SchemaVariant,
    pub timeout: Duration,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Longest log line scrubbed before truncation
    pub sanitize_max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            schema: SchemaVariant::Full,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `OncolensError::Config` naming the offending variable.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `OncolensError::Config` naming the offending variable.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(endpoint) = get(ENDPOINT_ENV) {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(OncolensError::Config(format!(
                    "{ENDPOINT_ENV} must be an http(s) URL, got {endpoint:?}"
                )));
            }
            config.endpoint = endpoint;
        }

        if let Some(path) = get(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(schema) = get(SCHEMA_ENV) {
            config.schema = schema.parse().map_err(|_| {
                OncolensError::Config(format!(
                    "{SCHEMA_ENV} must be \"full\" or \"compact\", got {schema:?}"
                ))
            })?;
        }

        if let Some(secs) = get(TIMEOUT_ENV) {
            let secs: u64 = secs
                .parse()
                .ok()
                .filter(|s| (1..=MAX_TIMEOUT_SECS).contains(s))
                .ok_or_else(|| {
                    OncolensError::Config(format!(
                        "{TIMEOUT_ENV} must be between 1 and {MAX_TIMEOUT_SECS}, got {secs:?}"
                    ))
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(mode) = get(LOG_MODE_ENV) {
            config.log_mode = match mode.to_ascii_lowercase().as_str() {
                "auto" => LogMode::Auto,
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                _ => {
                    return Err(OncolensError::Config(format!(
                        "{LOG_MODE_ENV} must be auto, file or stdout, got {mode:?}"
                    )))
                }
            };
        }

        if let Some(path) = get(LOG_FILE_ENV) {
            config.log_file = PathBuf::from(path);
        }

        if let Some(bytes) = get(SANITIZE_MAX_BYTES_ENV) {
            config.sanitize_max_bytes = bytes
                .parse::<usize>()
                .ok()
                .filter(|&b| b > 0)
                .ok_or_else(|| {
                    OncolensError::Config(format!(
                        "{SANITIZE_MAX_BYTES_ENV} must be a positive byte count, got {bytes:?}"
                    ))
                })?;
        }

        Ok(config)
    }
}
