//! Application configuration management.
//!
//! Configuration is layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`$WIFIQR_CONFIG`, else `/etc/wifiqr/config.toml`)
//! 3. Environment variables prefixed `WIFIQR__`, e.g.
//!    `WIFIQR__SERVER__PORT=8080` or `WIFIQR__RENDER__MODULE_SCALE=10`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archive::{ArchiveOptions, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_PARALLEL_RENDERS};
use crate::render::DEFAULT_MODULE_SCALE;
use crate::storage::default_data_dir;
use crate::validation::DEFAULT_MAX_BULK_IDS;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "WIFIQR_CONFIG";

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wifiqr/config.toml";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A single field has an invalid value.
    #[error("{field}: {message}")]
    ValidationError {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// More than one field is invalid.
    #[error("{} configuration errors", .0.len())]
    MultipleValidationErrors(Vec<ConfigError>),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// QR rendering and archive settings.
    pub render: RenderConfig,
    /// Bulk download limits.
    pub batch: BatchConfig,
    /// Record storage.
    pub storage: StorageConfig,
    /// Logging output.
    pub logging: LoggingConfig,
    /// Creation notifications.
    pub notifications: NotificationsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// QR rendering and archive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per QR module.
    pub module_scale: u32,
    /// Concurrent renders per bulk request.
    pub max_parallel_renders: usize,
    /// Deflate level for archive entries (0-9).
    pub compression_level: i64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_scale: DEFAULT_MODULE_SCALE,
            max_parallel_renders: DEFAULT_MAX_PARALLEL_RENDERS,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl RenderConfig {
    /// Archive options derived from this section.
    #[must_use]
    pub const fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            max_parallel_renders: self.max_parallel_renders,
            compression_level: self.compression_level,
        }
    }
}

/// Bulk download limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum ids accepted by one bulk request.
    pub max_ids: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_ids: DEFAULT_MAX_BULK_IDS,
        }
    }
}

/// Record storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `networks.json`.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSON file logging plus compact stdout when true, pretty stdout otherwise.
    pub production: bool,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Log directory override for production mode.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            production: false,
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Creation notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Emit an event for every created record.
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load from the default file location and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::load_from(&path)
    }

    /// Load from `path` (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?)
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("WIFIQR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges, reporting every problem.
    ///
    /// # Errors
    ///
    /// Returns a single [`ConfigError::ValidationError`] or
    /// [`ConfigError::MultipleValidationErrors`].
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "server.host",
                message: "must not be empty".to_string(),
            });
        }
        if self.render.module_scale == 0 || self.render.module_scale > 100 {
            errors.push(ConfigError::ValidationError {
                field: "render.module_scale",
                message: format!("must be between 1 and 100, got {}", self.render.module_scale),
            });
        }
        if self.render.max_parallel_renders == 0 {
            errors.push(ConfigError::ValidationError {
                field: "render.max_parallel_renders",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0..=9).contains(&self.render.compression_level) {
            errors.push(ConfigError::ValidationError {
                field: "render.compression_level",
                message: format!("must be between 0 and 9, got {}", self.render.compression_level),
            });
        }
        if self.batch.max_ids == 0 {
            errors.push(ConfigError::ValidationError {
                field: "batch.max_ids",
                message: "must be at least 1".to_string(),
            });
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.module_scale, 20);
        assert_eq!(config.batch.max_ids, 50);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[render]\nmax_parallel_renders = 2\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.render.max_parallel_renders, 2);
        assert_eq!(config.render.module_scale, DEFAULT_MODULE_SCALE);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.batch, BatchConfig::default());
    }

    #[test]
    fn test_invalid_values_are_all_reported() {
        let mut config = Config::default();
        config.render.module_scale = 0;
        config.render.compression_level = 12;

        match config.validate() {
            Err(ConfigError::MultipleValidationErrors(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_single_invalid_value() {
        let mut config = Config::default();
        config.batch.max_ids = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch.max_ids"));
    }

    #[test]
    fn test_archive_options_from_render_config() {
        let options = RenderConfig::default().archive_options();
        assert_eq!(options, ArchiveOptions::default());
    }
}
