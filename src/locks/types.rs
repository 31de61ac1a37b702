//! Per-call options and operation results.

use crate::config::{DEFAULT_TTL_SECONDS, LockDefaults};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the invocation was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// A production (scheduled/triggered) run.
    #[default]
    Production,
    /// A manual trial run. This is "test mode".
    Manual,
}

impl ExecutionMode {
    pub fn is_test(&self) -> bool {
        matches!(self, ExecutionMode::Manual)
    }
}

/// Which way `check` routed the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// The lock was free and is now held (or the test-mode bypass applied).
    Idle,
    /// The lock was already held. Nothing was written.
    Running,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Idle => write!(f, "Idle"),
            Route::Running => write!(f, "Running"),
        }
    }
}

/// Options for Inspect-or-Acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Expiry of a newly created record.
    pub ttl_seconds: u64,

    /// Execution context of the caller.
    pub mode: ExecutionMode,

    /// Whether manual runs skip the lock.
    pub ignore_in_test_mode: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            mode: ExecutionMode::default(),
            ignore_in_test_mode: false,
        }
    }
}

impl CheckOptions {
    /// Options seeded from configured defaults, for a production run.
    pub fn from_defaults(defaults: &LockDefaults) -> Self {
        Self {
            ttl_seconds: defaults.ttl_seconds,
            mode: ExecutionMode::Production,
            ignore_in_test_mode: defaults.ignore_in_test_mode,
        }
    }

    /// The test-mode bypass applies: always route to Idle, never overwrite.
    pub fn bypasses_lock(&self) -> bool {
        self.mode.is_test() && self.ignore_in_test_mode
    }
}

/// Options for KeepAlive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveOptions {
    pub ttl_seconds: u64,
}

impl Default for KeepAliveOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

/// Result of Inspect-or-Acquire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub workflow_id: String,

    /// Idle: the timestamp just written (or that would have been written under
    /// the bypass). Running: the stored value, `None` if the record expired
    /// between the existence check and the read.
    pub last_update: Option<String>,

    pub route: Route,

    /// Set only when the test-mode bypass decided the route.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub test_mode: bool,
}

/// Result of KeepAlive and Release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockReport {
    pub workflow_id: String,

    /// The new timestamp for KeepAlive, always `None` for Release.
    pub last_update: Option<String>,
}
