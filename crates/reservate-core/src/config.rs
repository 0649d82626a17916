//! Configuration management for the reservation admin client

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base name of the optional configuration file looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "reservate";

/// Prefix of environment variable overrides (`RESERVATE__API__BASE_URL`)
pub const ENV_PREFIX: &str = "RESERVATE";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST backend
    pub base_url: String,

    /// Path of the reservation resource
    pub reservation_path: String,

    /// Path of the client resource
    pub client_path: String,

    /// Path of the service resource
    pub service_path: String,

    /// Total request timeout in seconds
    pub request_timeout: u64,

    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log format (json or pretty)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            reservation_path: "/reservate".to_string(),
            client_path: "/client".to_string(),
            service_path: "/service".to_string(),
            request_timeout: 30,
            connect_timeout: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ApiConfig {
    /// Absolute URL of the reservation resource
    #[must_use]
    pub fn reservation_url(&self) -> String {
        self.join(&self.reservation_path)
    }

    /// Absolute URL of the client resource
    #[must_use]
    pub fn client_url(&self) -> String {
        self.join(&self.client_path)
    }

    /// Absolute URL of the service resource
    #[must_use]
    pub fn service_url(&self) -> String {
        self.join(&self.service_path)
    }

    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl LoggingConfig {
    /// Whether JSON output was requested
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AdminConfig {
    /// Load configuration from a file and the environment
    ///
    /// With `path` the file is required; otherwise `reservate.{toml,yaml,json}`
    /// in the working directory is used when present. `RESERVATE__*`
    /// environment variables override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the merged values do not
    /// deserialize.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let builder = config::Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Render the resolved configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Configuration {
            message: format!("Failed to serialize configuration: {e}"),
        })
    }
}
