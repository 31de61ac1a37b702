//! Redis backend.
//!
//! Uses the synchronous `redis` client. Each lock operation opens its own
//! connection through [`RedisConnector::connect`], which applies the
//! connect timeout and the connection-level retry budget, then sets the
//! command timeout as the socket read/write timeout. The connection is
//! closed when dropped.
//!
//! Connection info is built field by field from [`RedisSettings`].
//!
//! Commands are sent as raw `SET`/`GET`/`EXISTS`/`DEL` so the wire format
//! matches the protocol exactly (`SET key value EX ttl`, `SET key value NX EX ttl`).

use super::{BackendConnector, LockBackend};
use crate::config::RedisSettings;
use crate::error::{LockError, Result};
use redis::{
    Client, Connection, ConnectionAddr, ConnectionInfo, ErrorKind, IntoConnectionInfo,
    RedisConnectionInfo, RedisError, Value,
};
use std::time::Duration;

/// Upper bound on the delay between two connection attempts.
const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// Opens connections to a Redis server.
pub struct RedisConnector {
    client: Client,
    target: String,
    connect_timeout: Duration,
    command_timeout: Duration,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

impl RedisConnector {
    /// Build a connector from validated settings. No connection is made here.
    ///
    /// # Returns
    ///
    /// * `Ok(RedisConnector)` - Client created
    /// * `Err(LockError::Config)` - Settings do not form usable connection info
    pub fn from_settings(settings: &RedisSettings) -> Result<Self> {
        let client = connection_info(settings).and_then(Client::open).map_err(|e| {
            LockError::Config(format!(
                "invalid redis connection settings for {}: {}",
                display_target(settings),
                e
            ))
        })?;

        Ok(Self {
            client,
            target: display_target(settings),
            connect_timeout: Duration::from_millis(settings.connect_timeout_ms),
            command_timeout: Duration::from_millis(settings.command_timeout_ms),
            max_retries: settings.max_retries,
            retry_base_delay_ms: settings.retry_base_delay_ms,
        })
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let delay = self
            .retry_base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));
        Duration::from_millis(delay.min(MAX_RETRY_DELAY_MS))
    }

    fn connect_once(&self) -> std::result::Result<Connection, RedisError> {
        let conn = self.client.get_connection_with_timeout(self.connect_timeout)?;
        conn.set_read_timeout(Some(self.command_timeout))?;
        conn.set_write_timeout(Some(self.command_timeout))?;
        Ok(conn)
    }
}

impl BackendConnector for RedisConnector {
    type Connection = RedisConnection;

    fn connect(&self) -> Result<RedisConnection> {
        let mut attempt = 0;
        loop {
            match self.connect_once() {
                Ok(conn) => {
                    tracing::debug!(backend = %self.target, attempt = attempt + 1, "connected to redis");
                    return Ok(RedisConnection { conn });
                }
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    let delay = self.retry_delay(attempt);
                    tracing::warn!(
                        "redis connection attempt {}/{} to {} failed, retrying after {}ms: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        self.target,
                        delay.as_millis(),
                        e
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(LockError::BackendUnavailable(format!(
                        "failed to connect to redis at {} after {} attempt(s): {}",
                        self.target,
                        attempt + 1,
                        e
                    )));
                }
            }
        }
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// An open Redis connection. Closed when dropped.
pub struct RedisConnection {
    conn: Connection,
}

impl LockBackend for RedisConnection {
    fn exists(&mut self, key: &str) -> Result<bool> {
        let count: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query(&mut self.conn)
            .map_err(|e| command_error("EXISTS", e))?;
        Ok(count > 0)
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        redis::cmd("GET")
            .arg(key)
            .query(&mut self.conn)
            .map_err(|e| command_error("GET", e))
    }

    fn set_with_expiry(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query::<()>(&mut self.conn)
            .map_err(|e| command_error("SET", e))
    }

    fn set_if_absent(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool> {
        // Nil reply means NX rejected the write.
        let reply: Value = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query(&mut self.conn)
            .map_err(|e| command_error("SET NX", e))?;
        Ok(!matches!(reply, Value::Nil))
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query(&mut self.conn)
            .map_err(|e| command_error("DEL", e))?;
        Ok(removed > 0)
    }
}

/// Connection-level failures worth another connection attempt.
fn is_transient(e: &RedisError) -> bool {
    e.is_io_error() || e.is_timeout() || e.is_connection_refusal() || e.is_connection_dropped()
}

/// Failures that mean the server cannot be used right now: transport
/// problems plus rejected credentials.
fn is_unavailable(e: &RedisError) -> bool {
    is_transient(e)
        || e.kind() == ErrorKind::AuthenticationFailed
        || matches!(e.code(), Some("NOAUTH" | "WRONGPASS"))
}

/// Map a command failure onto the error taxonomy. Anything that is not an
/// availability problem is a terminal backend error.
fn command_error(command: &str, e: RedisError) -> LockError {
    if is_unavailable(&e) {
        LockError::BackendUnavailable(format!("redis {} failed: {}", command, e))
    } else {
        LockError::Backend(format!("redis {} failed: {}", command, e))
    }
}

/// TCP address plus database and credentials for the handshake.
pub(crate) fn connection_info(settings: &RedisSettings) -> redis::RedisResult<ConnectionInfo> {
    let mut handshake = RedisConnectionInfo::default().set_db(settings.database);
    if let Some(username) = &settings.username {
        handshake = handshake.set_username(username);
    }
    if let Some(password) = &settings.password {
        handshake = handshake.set_password(password);
    }

    let addr = ConnectionAddr::Tcp(settings.host.trim().to_string(), settings.port);
    Ok(addr.into_connection_info()?.set_redis_settings(handshake))
}

/// Target description for logs and error messages. Never includes credentials.
pub(crate) fn display_target(settings: &RedisSettings) -> String {
    let host = settings.host.trim();
    if host.contains(':') {
        format!("[{}]:{}/{}", host, settings.port, settings.database)
    } else {
        format!("{}:{}/{}", host, settings.port, settings.database)
    }
}
