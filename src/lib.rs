//! Execlock: a TTL-based execution lock for workflows, stored in Redis.
//!
//! A workflow run calls `check` before doing work, `keep-alive` while the
//! work takes longer than the TTL, and `release` when it is done. The lock
//! is advisory and expires on its own if the run dies.
//!
//! The library is split the same way the CLI is:
//! - [`locks`]: the lock protocol ([`locks::LockCoordinator`])
//! - [`backend`]: the key-value store it runs against
//! - [`config`], [`cli`], [`commands`]: wiring for the `execlock` binary

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod logging;

#[cfg(test)]
mod test_support;
