use super::*;
use crate::backend::memory::MemoryStore;
use crate::config::AcquireStrategy;
use crate::test_support::ManualClock;
use clap::Parser;
use std::time::Duration;

fn command(args: &[&str]) -> Command {
    let mut argv = vec!["execlock"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn run(store: &MemoryStore, clock: &ManualClock, config: &Config, args: &[&str]) -> CommandOutput {
    execute(command(args), config, store.connector(), clock.clone()).unwrap()
}

fn clock() -> ManualClock {
    ManualClock::at(2026, 10, 19, 9, 30)
}

#[test]
fn check_uses_configured_namespace_and_ttl() {
    let store = MemoryStore::new();
    let mut config = Config::default();
    config.lock.namespace = "workflows:executions".to_string();
    config.lock.ttl_seconds = 300;

    let output = run(&store, &clock(), &config, &["check", "--workflow-id", "wf-42"]);

    assert_eq!(output.exit_code(), exit_codes::SUCCESS);
    assert_eq!(
        store.value("workflows:executions:wf-42").as_deref(),
        Some("2026/10/19 09:30")
    );
    assert_eq!(
        store.ttl("workflows:executions:wf-42"),
        Some(Duration::from_secs(300))
    );
}

#[test]
fn flags_override_config() {
    let store = MemoryStore::new();
    let config = Config::default();

    run(
        &store,
        &clock(),
        &config,
        &["check", "--workflow-id", "wf-42", "-n", "jobs", "--ttl", "30"],
    );

    assert_eq!(store.value("executions:wf-42"), None);
    assert_eq!(store.ttl("jobs:wf-42"), Some(Duration::from_secs(30)));
}

#[test]
fn running_check_exits_with_lock_held() {
    let store = MemoryStore::new();
    store.insert("executions:wf-42", "2026/10/19 09:00", 120);

    let output = run(&store, &clock(), &Config::default(), &["check", "--workflow-id", "wf-42"]);

    assert_eq!(output.exit_code(), exit_codes::LOCK_HELD);
    assert_eq!(
        output.to_json().unwrap(),
        r#"{"workflowId":"wf-42","lastUpdate":"2026/10/19 09:00","route":"running"}"#
    );
}

#[test]
fn ignore_flag_from_config_applies_to_manual_runs() {
    let store = MemoryStore::new();
    store.insert("executions:wf-42", "2026/10/19 09:00", 120);
    let mut config = Config::default();
    config.lock.ignore_in_test_mode = true;

    let output = run(
        &store,
        &clock(),
        &config,
        &["check", "--workflow-id", "wf-42", "--mode", "manual"],
    );

    assert_eq!(output.exit_code(), exit_codes::SUCCESS);
    assert_eq!(
        output.to_json().unwrap(),
        r#"{"workflowId":"wf-42","lastUpdate":"2026/10/19 09:30","route":"idle","testMode":true}"#
    );
    assert_eq!(
        store.value("executions:wf-42").as_deref(),
        Some("2026/10/19 09:00")
    );
}

#[test]
fn ignore_flag_on_command_line_overrides_config() {
    let store = MemoryStore::new();
    store.insert("executions:wf-42", "2026/10/19 09:00", 120);
    let mut config = Config::default();
    config.lock.ignore_in_test_mode = true;

    let output = run(
        &store,
        &clock(),
        &config,
        &[
            "check",
            "--workflow-id",
            "wf-42",
            "--mode",
            "manual",
            "--ignore-in-test-mode=false",
        ],
    );

    assert_eq!(output.exit_code(), exit_codes::LOCK_HELD);
}

#[test]
fn strategy_flag_overrides_config() {
    let store = MemoryStore::new();
    let config = Config::default();
    assert_eq!(config.lock.acquire_strategy, AcquireStrategy::CheckThenSet);

    run(
        &store,
        &clock(),
        &config,
        &["check", "--workflow-id", "wf-42", "--strategy", "atomic"],
    );

    let calls = store.calls();
    assert_eq!(calls.set_nx, 1);
    assert_eq!(calls.exists, 0);
}

#[test]
fn keep_alive_and_release_round_out_a_run() {
    let store = MemoryStore::new();
    let clock = clock();
    let config = Config::default();

    run(&store, &clock, &config, &["check", "--workflow-id", "wf-42"]);

    clock.advance(Duration::from_secs(60));
    store.advance(Duration::from_secs(60));
    let renewed = run(&store, &clock, &config, &["keep-alive", "--workflow-id", "wf-42"]);
    assert_eq!(
        renewed.to_json().unwrap(),
        r#"{"workflowId":"wf-42","lastUpdate":"2026/10/19 09:31"}"#
    );
    assert_eq!(store.ttl("executions:wf-42"), Some(Duration::from_secs(120)));

    let released = run(&store, &clock, &config, &["release", "--workflow-id", "wf-42"]);
    assert_eq!(released.exit_code(), exit_codes::SUCCESS);
    assert_eq!(
        released.to_json().unwrap(),
        r#"{"workflowId":"wf-42","lastUpdate":null}"#
    );
    assert_eq!(store.value("executions:wf-42"), None);
}

#[test]
fn zero_ttl_flag_is_a_validation_error() {
    let store = MemoryStore::new();

    let err = execute(
        command(&["keep-alive", "--workflow-id", "wf-42", "--ttl", "0"]),
        &Config::default(),
        store.connector(),
        clock(),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    assert_eq!(store.calls().connects, 0);
}

#[test]
fn blank_namespace_flag_is_a_validation_error() {
    let store = MemoryStore::new();

    let err = execute(
        command(&["release", "--workflow-id", "wf-42", "--namespace", "  "]),
        &Config::default(),
        store.connector(),
        clock(),
    )
    .unwrap_err();

    assert!(matches!(err, LockError::Validation(_)));
    assert_eq!(store.calls().commands(), 0);
}

#[test]
fn backend_failure_maps_to_backend_exit_code() {
    let store = MemoryStore::new();
    store.fail_connections(true);

    let err = execute(
        command(&["check", "--workflow-id", "wf-42"]),
        &Config::default(),
        store.connector(),
        clock(),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::BACKEND_FAILURE);
}

#[test]
fn overrides_replace_only_given_fields() {
    let mut config = Config::default();
    config.redis.password = Some("from-file".to_string());

    let global = GlobalArgs {
        host: Some("redis.internal".to_string()),
        db: Some(3),
        ..GlobalArgs::default()
    };
    apply_overrides(&mut config, &global);

    assert_eq!(config.redis.host, "redis.internal");
    assert_eq!(config.redis.port, 6379);
    assert_eq!(config.redis.database, 3);
    assert_eq!(config.redis.password.as_deref(), Some("from-file"));
    assert_eq!(config.redis.username, None);
}

#[test]
fn blank_namespace_fails_the_same_from_config_or_flag() {
    let store = MemoryStore::new();
    let config = Config::from_yaml("lock:\n  namespace: \"  \"\n").unwrap();

    let from_config = execute(
        command(&["check", "--workflow-id", "wf-42"]),
        &config,
        store.connector(),
        clock(),
    )
    .unwrap_err();
    let from_flag = execute(
        command(&["check", "--workflow-id", "wf-42", "-n", "  "]),
        &Config::default(),
        store.connector(),
        clock(),
    )
    .unwrap_err();

    assert!(matches!(from_config, LockError::Validation(_)));
    assert_eq!(from_config.to_string(), from_flag.to_string());
    assert_eq!(from_config.exit_code(), exit_codes::VALIDATION_FAILURE);
    assert_eq!(from_flag.exit_code(), exit_codes::VALIDATION_FAILURE);
    assert_eq!(store.calls().connects, 0);
}

#[test]
fn zero_ttl_fails_the_same_from_config_or_flag() {
    let store = MemoryStore::new();
    let config = Config::from_yaml("lock:\n  ttl_seconds: 0\n").unwrap();

    let from_config = execute(
        command(&["keep-alive", "--workflow-id", "wf-42"]),
        &config,
        store.connector(),
        clock(),
    )
    .unwrap_err();

    assert!(matches!(from_config, LockError::Validation(_)));
    assert_eq!(from_config.exit_code(), exit_codes::VALIDATION_FAILURE);
    assert_eq!(store.calls().connects, 0);
}
