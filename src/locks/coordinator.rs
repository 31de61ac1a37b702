//! Inspect-or-Acquire, KeepAlive, and Release.

use super::guard::ConnectionGuard;
use super::key::LockKey;
use super::timestamp::{Clock, SystemClock, age_string, format_timestamp, parse_timestamp};
use super::types::{CheckOptions, CheckOutcome, KeepAliveOptions, LockReport, Route};
use crate::backend::{BackendConnector, LockBackend};
use crate::config::AcquireStrategy;
use crate::error::{LockError, Result};

/// Runs lock operations against a backend.
///
/// The coordinator holds no lock state. Every call validates its input,
/// opens a connection, derives the lock's state from the backend, and closes
/// the connection before returning.
pub struct LockCoordinator<C, K = SystemClock> {
    connector: C,
    clock: K,
    strategy: AcquireStrategy,
}

impl<C: BackendConnector, K: Clock> LockCoordinator<C, K> {
    /// A coordinator using the check-then-set strategy. Timestamps come from `clock`.
    pub fn with_clock(connector: C, clock: K) -> Self {
        Self {
            connector,
            clock,
            strategy: AcquireStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: AcquireStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn now(&self) -> String {
        format_timestamp(&self.clock.now())
    }

    /// Inspect-or-Acquire.
    ///
    /// Routes to [`Route::Idle`] when the lock was free (and creates it) and to
    /// [`Route::Running`] when a record already exists (and leaves it alone).
    /// With the test-mode bypass the route is always Idle and an existing
    /// record is never overwritten.
    ///
    /// Under [`AcquireStrategy::CheckThenSet`] the existence check and the
    /// write are separate commands, so two concurrent callers can both see
    /// the key absent and both route to Idle. [`AcquireStrategy::Atomic`]
    /// closes that window with a single conditional write.
    ///
    /// # Errors
    ///
    /// * `LockError::Validation` - Blank namespace/workflow ID or zero TTL; no backend call is made
    /// * `LockError::BackendUnavailable` / `LockError::Backend` - Propagated as-is, never turned into a route
    pub fn check(
        &self,
        namespace: &str,
        workflow_id: &str,
        options: &CheckOptions,
    ) -> Result<CheckOutcome> {
        let key = LockKey::new(namespace, workflow_id)?;
        validate_ttl(options.ttl_seconds)?;

        let mut conn = ConnectionGuard::open(&self.connector, &key, "check")?;

        let outcome = if options.bypasses_lock() {
            self.check_bypassing(&mut conn, &key, workflow_id, options)?
        } else {
            match self.strategy {
                AcquireStrategy::CheckThenSet => {
                    self.check_then_set(&mut conn, &key, workflow_id, options)?
                }
                AcquireStrategy::Atomic => self.check_atomic(&mut conn, &key, workflow_id, options)?,
            }
        };

        match outcome.route {
            Route::Idle => tracing::info!(
                key = %key,
                route = %outcome.route,
                ttl_seconds = options.ttl_seconds,
                test_mode = outcome.test_mode,
                "lock acquired"
            ),
            Route::Running => {
                let age = outcome
                    .last_update
                    .as_deref()
                    .and_then(parse_timestamp)
                    .map(|since| age_string(&since, &self.clock.now()))
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::info!(
                    key = %key,
                    route = %outcome.route,
                    last_update = outcome.last_update.as_deref().unwrap_or("null"),
                    age = %age,
                    "lock already held"
                );
            }
        }

        Ok(outcome)
    }

    /// Test-mode bypass: route to Idle regardless of the record, create it only if absent.
    fn check_bypassing<B: LockBackend>(
        &self,
        conn: &mut ConnectionGuard<B>,
        key: &LockKey,
        workflow_id: &str,
        options: &CheckOptions,
    ) -> Result<CheckOutcome> {
        let now = self.now();

        match self.strategy {
            AcquireStrategy::CheckThenSet => {
                if !conn.exists(key.as_str())? {
                    conn.set_with_expiry(key.as_str(), &now, options.ttl_seconds)?;
                } else {
                    tracing::debug!(key = %key, "test mode: leaving existing lock untouched");
                }
            }
            AcquireStrategy::Atomic => {
                if !conn.set_if_absent(key.as_str(), &now, options.ttl_seconds)? {
                    tracing::debug!(key = %key, "test mode: leaving existing lock untouched");
                }
            }
        }

        Ok(CheckOutcome {
            workflow_id: workflow_id.to_string(),
            last_update: Some(now),
            route: Route::Idle,
            test_mode: true,
        })
    }

    fn check_then_set<B: LockBackend>(
        &self,
        conn: &mut ConnectionGuard<B>,
        key: &LockKey,
        workflow_id: &str,
        options: &CheckOptions,
    ) -> Result<CheckOutcome> {
        if conn.exists(key.as_str())? {
            let last_update = conn.get(key.as_str())?;
            return Ok(running(workflow_id, last_update));
        }

        // Another caller may create the record between EXISTS and SET; both then route to Idle.
        let now = self.now();
        conn.set_with_expiry(key.as_str(), &now, options.ttl_seconds)?;
        Ok(idle(workflow_id, now))
    }

    fn check_atomic<B: LockBackend>(
        &self,
        conn: &mut ConnectionGuard<B>,
        key: &LockKey,
        workflow_id: &str,
        options: &CheckOptions,
    ) -> Result<CheckOutcome> {
        let now = self.now();
        if conn.set_if_absent(key.as_str(), &now, options.ttl_seconds)? {
            return Ok(idle(workflow_id, now));
        }

        let last_update = conn.get(key.as_str())?;
        Ok(running(workflow_id, last_update))
    }

    /// KeepAlive: unconditionally write the current timestamp and reset the TTL.
    ///
    /// Does not look at the previous record; calling it without a prior
    /// `check` creates the lock.
    pub fn keep_alive(
        &self,
        namespace: &str,
        workflow_id: &str,
        options: &KeepAliveOptions,
    ) -> Result<LockReport> {
        let key = LockKey::new(namespace, workflow_id)?;
        validate_ttl(options.ttl_seconds)?;

        let mut conn = ConnectionGuard::open(&self.connector, &key, "keep_alive")?;
        let now = self.now();
        conn.set_with_expiry(key.as_str(), &now, options.ttl_seconds)?;

        tracing::info!(
            key = %key,
            ttl_seconds = options.ttl_seconds,
            last_update = %now,
            "lock renewed"
        );

        Ok(LockReport {
            workflow_id: workflow_id.to_string(),
            last_update: Some(now),
        })
    }

    /// Release: delete the record. Deleting an absent record is not an error.
    pub fn release(&self, namespace: &str, workflow_id: &str) -> Result<LockReport> {
        let key = LockKey::new(namespace, workflow_id)?;

        let mut conn = ConnectionGuard::open(&self.connector, &key, "release")?;
        let existed = conn.delete(key.as_str())?;

        if existed {
            tracing::info!(key = %key, "lock released");
        } else {
            tracing::debug!(key = %key, "lock already absent");
        }

        Ok(LockReport {
            workflow_id: workflow_id.to_string(),
            last_update: None,
        })
    }
}

fn validate_ttl(ttl_seconds: u64) -> Result<()> {
    if ttl_seconds == 0 {
        return Err(LockError::Validation(
            "TTL must be greater than 0 seconds".to_string(),
        ));
    }
    Ok(())
}

fn idle(workflow_id: &str, now: String) -> CheckOutcome {
    CheckOutcome {
        workflow_id: workflow_id.to_string(),
        last_update: Some(now),
        route: Route::Idle,
        test_mode: false,
    }
}

fn running(workflow_id: &str, last_update: Option<String>) -> CheckOutcome {
    CheckOutcome {
        workflow_id: workflow_id.to_string(),
        last_update,
        route: Route::Running,
        test_mode: false,
    }
}
