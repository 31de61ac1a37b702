//! CLI argument parsing for execlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::AcquireStrategy;
use crate::locks::ExecutionMode;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Execlock: TTL-based execution lock for workflows.
///
/// Keeps two runs of the same workflow from proceeding at once:
/// - `check` takes the lock if it is free (exit 0) or reports it held (exit 4)
/// - `keep-alive` renews the lock while long work proceeds
/// - `release` deletes the lock when the run finishes
///
/// Each command prints a single JSON object on stdout.
#[derive(Parser, Debug)]
#[command(name = "execlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and config flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to a YAML config file.
    #[arg(long, global = true, env = "EXECLOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Redis host (overrides config).
    #[arg(long, global = true, env = "EXECLOCK_REDIS_HOST")]
    pub host: Option<String>,

    /// Redis port (overrides config).
    #[arg(long, global = true, env = "EXECLOCK_REDIS_PORT")]
    pub port: Option<u16>,

    /// Redis ACL username (overrides config).
    #[arg(long, global = true, env = "EXECLOCK_REDIS_USERNAME")]
    pub username: Option<String>,

    /// Redis password (overrides config).
    #[arg(long, global = true, env = "EXECLOCK_REDIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Redis logical database (overrides config).
    #[arg(long, global = true)]
    pub db: Option<i64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands for execlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a workflow is running and take the lock if it is not.
    ///
    /// Routes to "idle" (lock was free, now held; exit 0) or "running"
    /// (lock already held, left untouched; exit 4).
    Check(CheckArgs),

    /// Renew a workflow's lock.
    ///
    /// Rewrites the timestamp and resets the TTL whether or not the lock exists.
    KeepAlive(KeepAliveArgs),

    /// Release a workflow's lock.
    ///
    /// Deletes the lock. Releasing a lock that does not exist succeeds.
    Release(ReleaseArgs),
}

/// Which lock a command targets.
#[derive(Args, Debug)]
pub struct LockTarget {
    /// Unique ID of the workflow.
    #[arg(long, env = "EXECLOCK_WORKFLOW_ID")]
    pub workflow_id: String,

    /// Namespace grouping lock keys, e.g. "executions" or "workflows:executions".
    #[arg(short, long)]
    pub namespace: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: LockTarget,

    /// Lock time-to-live in seconds.
    #[arg(long)]
    pub ttl: Option<u64>,

    /// How this run was started; `manual` is test mode.
    #[arg(long, value_enum, default_value_t = ExecutionMode::Production, env = "EXECLOCK_MODE")]
    pub mode: ExecutionMode,

    /// Always route manual runs to idle without disturbing an existing lock.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_in_test_mode: Option<bool>,

    /// Acquire strategy (overrides config).
    #[arg(long, value_enum)]
    pub strategy: Option<AcquireStrategy>,
}

/// Arguments for the `keep-alive` command.
#[derive(Args, Debug)]
pub struct KeepAliveArgs {
    #[command(flatten)]
    pub target: LockTarget,

    /// Lock time-to-live in seconds.
    #[arg(long)]
    pub ttl: Option<u64>,
}

/// Arguments for the `release` command.
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub target: LockTarget,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
