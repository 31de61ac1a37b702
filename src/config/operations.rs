//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{LockError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `redis.host` must be non-empty
    /// - `redis.port` must be non-zero
    /// - `redis.connect_timeout_ms` and `redis.command_timeout_ms` must be positive
    ///
    /// `lock.namespace` and `lock.ttl_seconds` are checked per operation by the
    /// coordinator, the same way as values given on the command line.
    pub fn validate(&self) -> Result<()> {
        if self.redis.host.trim().is_empty() {
            return Err(LockError::Config(
                "config validation failed: redis.host must not be empty".to_string(),
            ));
        }

        if self.redis.port == 0 {
            return Err(LockError::Config(
                "config validation failed: redis.port must be greater than 0".to_string(),
            ));
        }

        if self.redis.connect_timeout_ms == 0 {
            return Err(LockError::Config(
                "config validation failed: redis.connect_timeout_ms must be greater than 0"
                    .to_string(),
            ));
        }

        if self.redis.command_timeout_ms == 0 {
            return Err(LockError::Config(
                "config validation failed: redis.command_timeout_ms must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
