//! Configuration types and defaults for execlock.
//!
//! This module defines the nested settings sections, enums, and default
//! value functions used by the Config struct.

use serde::{Deserialize, Serialize};

/// How `check` turns "the key is absent" into "the lock is now held".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AcquireStrategy {
    /// EXISTS followed by SET EX. Two round-trips with a window in between
    /// where concurrent callers can both observe "absent" and both win.
    #[default]
    CheckThenSet,
    /// A single `SET key value NX EX ttl`. At most one caller wins per TTL window.
    Atomic,
}

/// Connection settings for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// Server hostname.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// ACL username (Redis 6+). Password-only auth when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password. Prefer `EXECLOCK_REDIS_PASSWORD` over storing it in YAML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Logical database index.
    pub database: i64,

    /// Timeout for establishing a connection.
    pub connect_timeout_ms: u64,

    /// Read/write timeout applied to every command.
    pub command_timeout_ms: u64,

    /// Connection-level retry budget. Lock operations themselves are never retried.
    pub max_retries: u32,

    /// Base delay between connection attempts, doubled per attempt.
    pub retry_base_delay_ms: u64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            database: 0,
            connect_timeout_ms: default_connect_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

/// Defaults applied to lock operations when the caller does not supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockDefaults {
    /// Namespace prefixed to every lock key.
    pub namespace: String,

    /// Lock time-to-live in seconds.
    pub ttl_seconds: u64,

    /// Whether manual (test) runs skip the lock in `check`.
    pub ignore_in_test_mode: bool,

    /// Acquire strategy for `check`.
    pub acquire_strategy: AcquireStrategy,
}

impl Default for LockDefaults {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            ignore_in_test_mode: false,
            acquire_strategy: AcquireStrategy::default(),
        }
    }
}

/// Default lock TTL in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 120;

/// Default lock namespace.
pub const DEFAULT_NAMESPACE: &str = "executions";

pub(crate) fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
pub(crate) fn default_host() -> String {
    "127.0.0.1".to_string()
}
pub(crate) fn default_port() -> u16 {
    6379
}
pub(crate) fn default_connect_timeout_ms() -> u64 {
    10_000
}
pub(crate) fn default_command_timeout_ms() -> u64 {
    5_000
}
pub(crate) fn default_max_retries() -> u32 {
    3
}
pub(crate) fn default_retry_base_delay_ms() -> u64 {
    100
}
