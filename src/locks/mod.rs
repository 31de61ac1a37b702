//! Execution lock subsystem.
//!
//! An execution lock is an advisory record in a key-value store marking a
//! workflow as presumably running. There is one record per
//! `(namespace, workflow ID)` pair:
//!
//! - Key: `namespace:workflowId`
//! - Value: local timestamp `YYYY/MM/DD HH:MM` of creation or last renewal
//! - Expiry: backend-native TTL in seconds
//!
//! # Lifecycle
//!
//! `Absent -> check (create) -> Held -> keep_alive (renew) -> Held -> release | TTL -> Absent`
//!
//! The state machine lives entirely in the backend. [`LockCoordinator`]
//! re-derives it on every call and keeps nothing between calls.
//!
//! # Limits
//!
//! There is no owner token: any caller holding the key can renew or delete
//! any other caller's lock. `keep_alive` and `release` ignore test mode, so
//! a manual run calling them does affect a production run's record.

mod coordinator;
mod guard;
mod key;
pub mod timestamp;
mod types;


// Re-export public API
pub use coordinator::LockCoordinator;
pub use guard::ConnectionGuard;
pub use key::LockKey;
pub use timestamp::{Clock, SystemClock, TIMESTAMP_FORMAT};
pub use types::{CheckOptions, CheckOutcome, ExecutionMode, KeepAliveOptions, LockReport, Route};
