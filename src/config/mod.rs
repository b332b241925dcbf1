//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::sorting::options::SortConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Origins allowed by CORS; `"*"` allows any, empty disables CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Address in `host:port` form
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Page size settings for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "habits=info,tower_http=info".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Every section is optional in YAML and falls back to its defaults.
///
/// ```yaml
/// server:
///   host: 0.0.0.0
///   port: 8080
/// pagination:
///   default_limit: 10
///   max_limit: 50
/// sorting:
///   habits:
///     default: name asc
///     aliases:
///       name: name
///       created: created_at
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,

    /// Sort overrides per resource name (e.g., "habits")
    pub sorting: IndexMap<String, SortConfig>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load {
            message: e.to_string(),
        })?;

        if config.pagination.default_limit == 0 || config.pagination.max_limit == 0 {
            return Err(ConfigError::Load {
                message: "pagination limits must be at least 1".to_string(),
            });
        }

        Ok(config)
    }

    /// Sort override for a resource, if configured
    pub fn sort_for(&self, resource: &str) -> Option<&SortConfig> {
        self.sorting.get(resource)
    }

    /// Create a default configuration for development and tests
    pub fn default_config() -> Self {
        Self::default()
    }
}
