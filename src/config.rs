//! Configuration management for opskit.
//!
//! Handles loading configuration from TOML files and environment variables.
//! Service credentials are never stored in the file; the API token comes
//! from the environment at run time.

use crate::error::{OpskitError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API token for the service endpoint.
pub const TOKEN_ENV: &str = "OPSKIT_API_TOKEN";

/// Main configuration structure for opskit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Service endpoint configuration shared by all clients.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Query runner configuration.
    #[serde(default)]
    pub query: QueryConfig,

    /// Clock-shift configuration.
    #[serde(default)]
    pub shift: ShiftConfig,
}

/// Connection settings shared by every service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service API.
    pub endpoint: Option<String>,

    /// Region identifier forwarded with query submissions.
    pub region: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API token. Not read from the file; populated from `OPSKIT_API_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: None,
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl ServiceConfig {
    /// Returns the configured endpoint, or a configuration error.
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'endpoint' in [service]"))
    }

    /// Returns the API token, or a configuration error naming the variable.
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| OpskitError::config(format!("{TOKEN_ENV} environment variable not set")))
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Query runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Target database within the query service catalog.
    pub database: Option<String>,

    /// Workgroup the query runs under, if the service uses them.
    pub workgroup: Option<String>,

    /// Bucket holding query output objects.
    pub bucket: Option<String>,

    /// Key prefix for query output objects within the bucket.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Query text to submit.
    pub sql: Option<String>,

    /// Seconds to wait between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_output_path() -> String {
    "results".to_string()
}

fn default_poll_interval_secs() -> u64 {
    3
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            database: None,
            workgroup: None,
            bucket: None,
            output_path: default_output_path(),
            sql: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl QueryConfig {
    /// Returns the configured database name, or a configuration error.
    pub fn database(&self) -> Result<&str> {
        self.database
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'database' in [query]"))
    }

    /// Returns the configured output bucket, or a configuration error.
    pub fn bucket(&self) -> Result<&str> {
        self.bucket
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'bucket' in [query]"))
    }

    /// Returns the configured query text, or a configuration error.
    pub fn sql(&self) -> Result<&str> {
        self.sql
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'sql' in [query]"))
    }

    /// Returns the poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Returns the output location URL for submitted queries.
    pub fn output_location(&self) -> Result<String> {
        Ok(format!("s3://{}/{}", self.bucket()?, self.output_path))
    }
}

/// Clock-shift configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShiftConfig {
    /// Account alias embedded in the notification subject.
    pub account_alias: Option<String>,

    /// Notification topic identifier.
    pub topic: Option<String>,

    /// Parameter-store key holding the comma-separated rule list.
    pub rules_parameter: Option<String>,
}

impl ShiftConfig {
    /// Returns the account alias, or a configuration error.
    pub fn account_alias(&self) -> Result<&str> {
        self.account_alias
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'account_alias' in [shift]"))
    }

    /// Returns the notification topic, or a configuration error.
    pub fn topic(&self) -> Result<&str> {
        self.topic
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'topic' in [shift]"))
    }

    /// Returns the rules parameter key, or a configuration error.
    pub fn rules_parameter(&self) -> Result<&str> {
        self.rules_parameter
            .as_deref()
            .ok_or_else(|| OpskitError::config("missing field 'rules_parameter' in [shift]"))
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opskit")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file, then applies environment
    /// variable overrides.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| OpskitError::config(format!("Failed to read config file: {e}")))?;
            Self::parse_toml(&content, path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            OpskitError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables on top of the file configuration.
    ///
    /// `OPSKIT_API_TOKEN` supplies the token; `OPSKIT_ALIAS`, `OPSKIT_TOPIC`,
    /// and `OPSKIT_RULES_PARAM` override the clock-shift settings.
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            self.service.token = Some(token);
        }
        if let Ok(alias) = std::env::var("OPSKIT_ALIAS") {
            self.shift.account_alias = Some(alias);
        }
        if let Ok(topic) = std::env::var("OPSKIT_TOPIC") {
            self.shift.topic = Some(topic);
        }
        if let Ok(param) = std::env::var("OPSKIT_RULES_PARAM") {
            self.shift.rules_parameter = Some(param);
        }
    }
}
