//! Key-value backends the lock coordinator runs against.
//!
//! A backend is split in two:
//! - [`BackendConnector`] opens one connection per lock operation.
//! - [`LockBackend`] is that connection: the four single-key commands the
//!   lock protocol needs, plus the conditional write used by the atomic
//!   acquire strategy.
//!
//! Each command is atomic on its own. Nothing here makes a sequence of
//! commands atomic; that is the coordinator's problem.
//!
//! # Backends
//!
//! - [`redis::RedisConnector`]: the production backend.
//! - [`memory::MemoryStore`]: in-process store with TTL emulation and call
//!   counters, used as a test double.

pub mod memory;
pub mod redis;

use crate::error::Result;

/// One open connection to a key-value store.
///
/// Dropping the connection closes it.
pub trait LockBackend {
    /// `EXISTS key`.
    fn exists(&mut self, key: &str) -> Result<bool>;

    /// `GET key`. `None` when the key is absent or expired.
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// `SET key value EX ttl_seconds`. Overwrites any existing value and expiry.
    fn set_with_expiry(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// `SET key value NX EX ttl_seconds`. Returns `false` if the key already existed,
    /// in which case nothing is written.
    fn set_if_absent(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool>;

    /// `DEL key`. Returns whether a key was removed; deleting an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<bool>;
}

/// Opens backend connections.
pub trait BackendConnector {
    type Connection: LockBackend;

    /// Open a connection, applying whatever connection-level retry budget
    /// the backend is configured with.
    fn connect(&self) -> Result<Self::Connection>;

    /// Short description of the target for logs (never includes credentials).
    fn describe(&self) -> String;
}
