//! In-process key-value store with TTL emulation.
//!
//! Time in the store is manual: it starts at zero and only moves when
//! [`MemoryStore::advance`] is called, so expiry behavior is deterministic.
//! Every command and every connection open/close is counted so callers can
//! assert exactly which backend traffic an operation produced.

use super::{BackendConnector, LockBackend};
use crate::error::{LockError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Counters for backend traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub connects: usize,
    pub closes: usize,
    pub exists: usize,
    pub get: usize,
    pub set: usize,
    pub set_nx: usize,
    pub delete: usize,
}

impl CallCounts {
    /// Total number of commands sent over any connection.
    pub fn commands(&self) -> usize {
        self.exists + self.get + self.set + self.set_nx + self.delete
    }

    /// Commands that could have modified the store.
    pub fn writes(&self) -> usize {
        self.set + self.set_nx + self.delete
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Duration,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    now: Duration,
    calls: CallCounts,
    fail_connections: bool,
    fail_commands: bool,
}

impl State {
    fn live_entry(&mut self, key: &str) -> Option<&Entry> {
        let now = self.now;
        if self.entries.get(key).is_some_and(|e| e.expires_at <= now) {
            self.entries.remove(key);
        }
        self.entries.get(key)
    }

    fn write(&mut self, key: &str, value: &str, ttl_seconds: u64) {
        let expires_at = self.now + Duration::from_secs(ttl_seconds);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    fn check_command(&self) -> Result<()> {
        if self.fail_commands {
            return Err(LockError::BackendUnavailable(
                "memory store: command timed out".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared handle to an in-process store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// A connector whose connections all operate on this store.
    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector {
            store: self.clone(),
        }
    }

    /// Move the store's clock forward, expiring any key whose TTL has elapsed.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state();
        state.now += by;
        let now = state.now;
        state.entries.retain(|_, e| e.expires_at > now);
    }

    /// Snapshot of the traffic counters.
    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    pub fn reset_calls(&self) {
        self.state().calls = CallCounts::default();
    }

    /// Connections opened and not yet dropped.
    pub fn open_connections(&self) -> usize {
        let calls = self.calls();
        calls.connects - calls.closes
    }

    /// Seed a record without touching the counters.
    pub fn insert(&self, key: &str, value: &str, ttl_seconds: u64) {
        self.state().write(key, value, ttl_seconds);
    }

    /// Read a record without touching the counters.
    pub fn value(&self, key: &str) -> Option<String> {
        self.state().live_entry(key).map(|e| e.value.clone())
    }

    /// Remaining time-to-live of a record, without touching the counters.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut state = self.state();
        let now = state.now;
        state.live_entry(key).map(|e| e.expires_at - now)
    }

    /// Make every subsequent connection attempt fail.
    pub fn fail_connections(&self, fail: bool) {
        self.state().fail_connections = fail;
    }

    /// Make every subsequent command fail after the connection is open.
    pub fn fail_commands(&self, fail: bool) {
        self.state().fail_commands = fail;
    }
}

/// Opens [`MemoryConnection`]s to a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl BackendConnector for MemoryConnector {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection> {
        let mut state = self.store.state();
        if state.fail_connections {
            return Err(LockError::BackendUnavailable(
                "memory store: connection refused".to_string(),
            ));
        }
        state.calls.connects += 1;
        drop(state);

        Ok(MemoryConnection {
            store: self.store.clone(),
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// A counted connection to a [`MemoryStore`]. Dropping it records a close.
#[derive(Debug)]
pub struct MemoryConnection {
    store: MemoryStore,
}

impl LockBackend for MemoryConnection {
    fn exists(&mut self, key: &str) -> Result<bool> {
        let mut state = self.store.state();
        state.calls.exists += 1;
        state.check_command()?;
        Ok(state.live_entry(key).is_some())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let mut state = self.store.state();
        state.calls.get += 1;
        state.check_command()?;
        Ok(state.live_entry(key).map(|e| e.value.clone()))
    }

    fn set_with_expiry(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut state = self.store.state();
        state.calls.set += 1;
        state.check_command()?;
        state.write(key, value, ttl_seconds);
        Ok(())
    }

    fn set_if_absent(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool> {
        let mut state = self.store.state();
        state.calls.set_nx += 1;
        state.check_command()?;
        if state.live_entry(key).is_some() {
            return Ok(false);
        }
        state.write(key, value, ttl_seconds);
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let mut state = self.store.state();
        state.calls.delete += 1;
        state.check_command()?;
        let existed = state.live_entry(key).is_some();
        state.entries.remove(key);
        Ok(existed)
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.store.state().calls.closes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        let mut conn = store.connector().connect().unwrap();

        conn.set_with_expiry("ns:a", "2026/10/19 09:30", 60).unwrap();
        assert!(conn.exists("ns:a").unwrap());
        assert_eq!(conn.get("ns:a").unwrap().as_deref(), Some("2026/10/19 09:30"));
        assert_eq!(store.ttl("ns:a"), Some(Duration::from_secs(60)));
    }

    #[test]
    fn keys_expire_when_ttl_elapses() {
        let store = MemoryStore::new();
        store.insert("ns:a", "v", 5);

        store.advance(Duration::from_secs(4));
        assert_eq!(store.value("ns:a").as_deref(), Some("v"));
        assert_eq!(store.ttl("ns:a"), Some(Duration::from_secs(1)));

        store.advance(Duration::from_secs(1));
        assert_eq!(store.value("ns:a"), None);

        let mut conn = store.connector().connect().unwrap();
        assert!(!conn.exists("ns:a").unwrap());
    }

    #[test]
    fn set_if_absent_does_not_overwrite() {
        let store = MemoryStore::new();
        store.insert("ns:a", "first", 30);
        let mut conn = store.connector().connect().unwrap();

        assert!(!conn.set_if_absent("ns:a", "second", 90).unwrap());
        assert_eq!(store.value("ns:a").as_deref(), Some("first"));
        assert_eq!(store.ttl("ns:a"), Some(Duration::from_secs(30)));

        assert!(conn.set_if_absent("ns:b", "second", 90).unwrap());
        assert_eq!(store.value("ns:b").as_deref(), Some("second"));
    }

    #[test]
    fn delete_reports_whether_key_existed() {
        let store = MemoryStore::new();
        store.insert("ns:a", "v", 30);
        let mut conn = store.connector().connect().unwrap();

        assert!(conn.delete("ns:a").unwrap());
        assert!(!conn.delete("ns:a").unwrap());
    }

    #[test]
    fn connections_are_counted_and_closed_on_drop() {
        let store = MemoryStore::new();
        {
            let mut conn = store.connector().connect().unwrap();
            conn.exists("ns:a").unwrap();
            assert_eq!(store.open_connections(), 1);
        }
        let calls = store.calls();
        assert_eq!(calls.connects, 1);
        assert_eq!(calls.closes, 1);
        assert_eq!(calls.exists, 1);
        assert_eq!(calls.commands(), 1);
        assert_eq!(calls.writes(), 0);
    }

    #[test]
    fn seeding_and_peeking_are_not_counted() {
        let store = MemoryStore::new();
        store.insert("ns:a", "v", 30);
        let _ = store.value("ns:a");
        let _ = store.ttl("ns:a");
        assert_eq!(store.calls(), CallCounts::default());
    }

    #[test]
    fn injected_failures_surface_as_backend_unavailable() {
        let store = MemoryStore::new();

        store.fail_connections(true);
        let err = store.connector().connect().unwrap_err();
        assert!(matches!(err, LockError::BackendUnavailable(_)));
        store.fail_connections(false);

        let mut conn = store.connector().connect().unwrap();
        store.fail_commands(true);
        let err = conn.exists("ns:a").unwrap_err();
        assert!(matches!(err, LockError::BackendUnavailable(_)));
    }
}
