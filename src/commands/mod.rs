//! Command implementations for execlock.
//!
//! [`dispatch`] wires the parsed CLI to a Redis-backed coordinator and prints
//! the result. [`execute`] does the actual work against any connector and
//! clock, which is what the tests drive.

use crate::backend::BackendConnector;
use crate::backend::redis::RedisConnector;
use crate::cli::{CheckArgs, Cli, Command, GlobalArgs, KeepAliveArgs, LockTarget, ReleaseArgs};
use crate::config::Config;
use crate::error::{LockError, Result};
use crate::exit_codes;
use crate::locks::{
    CheckOptions, CheckOutcome, Clock, KeepAliveOptions, LockCoordinator, LockReport, Route,
    SystemClock,
};

/// What a command produced, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Check(CheckOutcome),
    KeepAlive(LockReport),
    Release(LockReport),
}

impl CommandOutput {
    /// Exit code for a successful command. A held lock is not an error but
    /// still gets its own code so shell callers can branch on it.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutput::Check(outcome) if outcome.route == Route::Running => {
                exit_codes::LOCK_HELD
            }
            _ => exit_codes::SUCCESS,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let rendered = match self {
            CommandOutput::Check(outcome) => serde_json::to_string(outcome),
            CommandOutput::KeepAlive(report) | CommandOutput::Release(report) => {
                serde_json::to_string(report)
            }
        };
        rendered.map_err(|e| LockError::Output(format!("failed to serialize result: {}", e)))
    }
}

/// Dispatch a command to its implementation.
///
/// Loads config, applies command-line overrides, connects to Redis, runs the
/// operation, and prints one JSON line on stdout. Returns the exit code.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let mut config = Config::load_or_default(cli.global.config.as_deref())?;
    apply_overrides(&mut config, &cli.global);
    config.validate()?;

    let connector = RedisConnector::from_settings(&config.redis)?;
    let output = execute(cli.command, &config, connector, SystemClock)?;

    println!("{}", output.to_json()?);
    Ok(output.exit_code())
}

/// Overlay connection flags onto the loaded config.
pub fn apply_overrides(config: &mut Config, global: &GlobalArgs) {
    if let Some(host) = &global.host {
        config.redis.host = host.clone();
    }
    if let Some(port) = global.port {
        config.redis.port = port;
    }
    if let Some(username) = &global.username {
        config.redis.username = Some(username.clone());
    }
    if let Some(password) = &global.password {
        config.redis.password = Some(password.clone());
    }
    if let Some(db) = global.db {
        config.redis.database = db;
    }
}

/// Run `command` against `connector`, resolving unset options from `config`.
pub fn execute<C, K>(
    command: Command,
    config: &Config,
    connector: C,
    clock: K,
) -> Result<CommandOutput>
where
    C: BackendConnector,
    K: Clock,
{
    tracing::debug!(backend = %connector.describe(), "executing command");

    match command {
        Command::Check(args) => {
            let strategy = args.strategy.unwrap_or(config.lock.acquire_strategy);
            let coordinator = LockCoordinator::with_clock(connector, clock).with_strategy(strategy);
            cmd_check(&coordinator, config, args).map(CommandOutput::Check)
        }
        Command::KeepAlive(args) => {
            let coordinator = LockCoordinator::with_clock(connector, clock);
            cmd_keep_alive(&coordinator, config, args).map(CommandOutput::KeepAlive)
        }
        Command::Release(args) => {
            let coordinator = LockCoordinator::with_clock(connector, clock);
            cmd_release(&coordinator, config, args).map(CommandOutput::Release)
        }
    }
}

fn namespace<'a>(target: &'a LockTarget, config: &'a Config) -> &'a str {
    target.namespace.as_deref().unwrap_or(&config.lock.namespace)
}

fn cmd_check<C: BackendConnector, K: Clock>(
    coordinator: &LockCoordinator<C, K>,
    config: &Config,
    args: CheckArgs,
) -> Result<CheckOutcome> {
    let mut options = CheckOptions::from_defaults(&config.lock);
    options.mode = args.mode;
    if let Some(ttl) = args.ttl {
        options.ttl_seconds = ttl;
    }
    if let Some(ignore) = args.ignore_in_test_mode {
        options.ignore_in_test_mode = ignore;
    }

    coordinator.check(
        namespace(&args.target, config),
        &args.target.workflow_id,
        &options,
    )
}

fn cmd_keep_alive<C: BackendConnector, K: Clock>(
    coordinator: &LockCoordinator<C, K>,
    config: &Config,
    args: KeepAliveArgs,
) -> Result<LockReport> {
    let options = KeepAliveOptions {
        ttl_seconds: args.ttl.unwrap_or(config.lock.ttl_seconds),
    };
    coordinator.keep_alive(
        namespace(&args.target, config),
        &args.target.workflow_id,
        &options,
    )
}

fn cmd_release<C: BackendConnector, K: Clock>(
    coordinator: &LockCoordinator<C, K>,
    config: &Config,
    args: ReleaseArgs,
) -> Result<LockReport> {
    coordinator.release(namespace(&args.target, config), &args.target.workflow_id)
}

#[cfg(test)]
mod tests;
