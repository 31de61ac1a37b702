//! Config struct definition.

use super::types::{LockDefaults, RedisSettings};
use serde::{Deserialize, Serialize};

/// Configuration for execlock.
///
/// This struct represents the contents of the YAML file passed with `--config`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Backend settings
    // =========================================================================
    /// Redis connection settings.
    pub redis: RedisSettings,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Defaults for namespace, TTL, and test-mode behavior.
    pub lock: LockDefaults,
}
