//! Exit code constants for the execlock CLI.
//!
//! - 0: Success (for `check`: the lock was free and is now held)
//! - 1: User error (bad args, unreadable or invalid config)
//! - 2: Validation failure (empty namespace/workflow ID, zero TTL)
//! - 3: Backend failure (connection, timeout, auth, protocol)
//! - 4: Lock held (`check` routed to Running)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: rejected before any backend call was made.
pub const VALIDATION_FAILURE: i32 = 2;

/// Backend failure: the key-value store could not serve the operation.
pub const BACKEND_FAILURE: i32 = 3;

/// The lock is already held by another run.
pub const LOCK_HELD: i32 = 4;
