//! RAII guard for a backend connection.

use super::key::LockKey;
use crate::backend::{BackendConnector, LockBackend};
use crate::error::Result;
use std::ops::{Deref, DerefMut};

/// Holds one backend connection for the duration of one lock operation.
///
/// The connection is closed when the guard is dropped, on success, on
/// error returns, and on unwinding alike.
#[derive(Debug)]
pub struct ConnectionGuard<B: LockBackend> {
    conn: B,
    key: String,
    operation: &'static str,
}

impl<B: LockBackend> ConnectionGuard<B> {
    /// Open a connection for `operation` on `key`.
    pub(super) fn open<C>(connector: &C, key: &LockKey, operation: &'static str) -> Result<Self>
    where
        C: BackendConnector<Connection = B>,
    {
        let conn = connector.connect()?;
        tracing::debug!(
            key = %key,
            operation,
            backend = %connector.describe(),
            "acquired backend connection"
        );
        Ok(Self {
            conn,
            key: key.to_string(),
            operation,
        })
    }
}

impl<B: LockBackend> Deref for ConnectionGuard<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.conn
    }
}

impl<B: LockBackend> DerefMut for ConnectionGuard<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.conn
    }
}

impl<B: LockBackend> Drop for ConnectionGuard<B> {
    fn drop(&mut self) {
        // The connection field is dropped (and closed) right after this runs.
        tracing::debug!(
            key = %self.key,
            operation = self.operation,
            "released backend connection"
        );
    }
}
