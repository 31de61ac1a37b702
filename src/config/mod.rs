//! Configuration model for execlock.
//!
//! This module defines the Config struct loaded from the YAML file given with
//! `--config`. It supports forward-compatible YAML parsing (unknown fields are
//! ignored), sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{AcquireStrategy, DEFAULT_NAMESPACE, DEFAULT_TTL_SECONDS, LockDefaults, RedisSettings};
