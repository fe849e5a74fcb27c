//! Cache Store - Redis adapter behind the caching layer
//!
//! Thin key/value adapter that owns every direct Redis interaction:
//! - Lazy connection with a short connect timeout
//! - Ping verification before every operation
//! - Get / set-with-TTL / delete / delete-by-prefix / stats
//!
//! Backend failures never cross this boundary. Callers see a miss (`None`),
//! a skipped write (`false`) or zeroed stats instead of an error.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{MovieRecError, MovieRecResult};

/// Cache store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStoreConfig {
    /// Enable the cache store; disabled means every operation is a no-op
    pub enabled: bool,
    /// Redis connection URL
    pub redis_url: String,
    /// Timeout for establishing a connection (milliseconds)
    pub connect_timeout_ms: u64,
    /// Timeout for a single command, ping included (milliseconds)
    pub command_timeout_ms: u64,
    /// Longest key accepted for writes (bytes)
    pub max_key_bytes: usize,
}

impl Default for CacheStoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            command_timeout_ms: 5000,
            max_key_bytes: 512,
        }
    }
}

impl CacheStoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("REDIS_URL") {
            if !url.is_empty() {
                config.redis_url = url;
            }
        }

        if let Ok(enabled) = std::env::var("CACHE_ENABLED") {
            config.enabled = !matches!(enabled.to_lowercase().as_str(), "false" | "0" | "off");
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> MovieRecResult<()> {
        if self.enabled && self.redis_url.is_empty() {
            return Err(MovieRecError::config_error(
                "Redis URL must not be empty when caching is enabled",
            ));
        }

        if self.connect_timeout_ms == 0 {
            return Err(MovieRecError::config_error(
                "Connect timeout must be greater than 0",
            ));
        }

        if self.command_timeout_ms == 0 {
            return Err(MovieRecError::config_error(
                "Command timeout must be greater than 0",
            ));
        }

        if self.max_key_bytes == 0 {
            return Err(MovieRecError::config_error(
                "Max key bytes must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Snapshot of backend health and keyspace counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStoreStats {
    pub status: String,
    pub total_keys: u64,
    pub used_memory: String,
    pub connected_clients: u64,
    pub total_commands_processed: u64,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
}

impl Default for CacheStoreStats {
    fn default() -> Self {
        Self {
            status: "disconnected".to_string(),
            total_keys: 0,
            used_memory: "0".to_string(),
            connected_clients: 0,
            total_commands_processed: 0,
            keyspace_hits: 0,
            keyspace_misses: 0,
        }
    }
}

/// Internal failure modes, absorbed before they reach callers
#[derive(Debug, Error)]
enum StoreError {
    #[error("redis client is not configured")]
    NoClient,
    #[error("failed to connect to redis: {0}")]
    Connect(#[source] redis::RedisError),
    #[error("redis command failed: {0}")]
    Command(#[from] redis::RedisError),
    #[error("redis command timed out after {0}ms")]
    Timeout(u64),
}

/// Behavior contract for the cache store.
///
/// Implementations never surface backend failures: a broken or missing
/// backend reads as a miss (`None`), a failed write as `false`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// True when the backend is reachable and answering pings.
    async fn is_available(&self) -> bool;

    /// Fetch the raw payload stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, expiring after `ttl_seconds`.
    /// Returns whether the write happened.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> bool;

    /// Remove a single key. Returns whether a key was removed.
    async fn delete(&self, key: &str) -> bool;

    /// Remove every key starting with `prefix`. Returns the number removed.
    async fn delete_by_prefix(&self, prefix: &str) -> u64;

    /// Snapshot of backend health and keyspace counters.
    async fn stats(&self) -> CacheStoreStats;
}

/// Redis-backed cache store.
///
/// The store comes up even when Redis is unreachable, reconnects lazily and
/// verifies the link with a ping before every operation. A connection that
/// fails a ping or a command is dropped so the next call starts fresh.
pub struct RedisCacheStore {
    client: Option<redis::Client>,
    connection: Mutex<Option<MultiplexedConnection>>,
    config: CacheStoreConfig,
}

impl RedisCacheStore {
    /// Create a store and attempt an initial connection. Never fails: an
    /// unreachable backend leaves the store in degraded mode where every
    /// operation reports a miss.
    pub async fn connect(config: CacheStoreConfig) -> Self {
        let client = if config.enabled {
            match redis::Client::open(config.redis_url.as_str()) {
                Ok(client) => Some(client),
                Err(err) => {
                    log::warn!("Invalid Redis URL, cache store disabled: {}", err);
                    None
                }
            }
        } else {
            None
        };

        let store = Self {
            client,
            connection: Mutex::new(None),
            config,
        };

        if store.config.enabled {
            match store.live_connection().await {
                Ok(_) => log::info!("Cache store connected to {}", store.config.redis_url),
                Err(err) => log::warn!(
                    "Cache store starting without Redis ({}), operations degrade to misses",
                    err
                ),
            }
        }

        store
    }

    pub fn config(&self) -> &CacheStoreConfig {
        &self.config
    }

    async fn open_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let client = self.client.as_ref().ok_or(StoreError::NoClient)?;

        match tokio::time::timeout(
            Duration::from_millis(self.config.connect_timeout_ms),
            client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(err)) => Err(StoreError::Connect(err)),
            Err(_) => Err(StoreError::Timeout(self.config.connect_timeout_ms)),
        }
    }

    /// Reuse the cached connection or open a new one, then ping it. A
    /// connection that fails the ping is dropped before the error returns.
    async fn live_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let existing = match self.connection.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };

        let mut conn = match existing {
            Some(conn) => conn,
            None => {
                let conn = self.open_connection().await?;
                if let Ok(mut guard) = self.connection.lock() {
                    *guard = Some(conn.clone());
                }
                conn
            }
        };

        let probe: Result<String, StoreError> = self
            .with_timeout(redis::cmd("PING").query_async(&mut conn))
            .await;

        match probe {
            Ok(_) => Ok(conn),
            Err(err) => {
                self.drop_connection();
                Err(err)
            }
        }
    }

    fn drop_connection(&self) {
        if let Ok(mut guard) = self.connection.lock() {
            *guard = None;
        }
    }

    async fn with_timeout<T>(
        &self,
        operation: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, StoreError> {
        let limit = Duration::from_millis(self.config.command_timeout_ms);
        match tokio::time::timeout(limit, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(StoreError::Command(err)),
            Err(_) => Err(StoreError::Timeout(self.config.command_timeout_ms)),
        }
    }
}

#[async_trait]
impl CacheBackend for RedisCacheStore {
    async fn is_available(&self) -> bool {
        self.config.enabled && self.live_connection().await.is_ok()
    }

    async fn get(&self, key: &str) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        let mut conn = match self.live_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::debug!("Cache get skipped for '{}': {}", key, err);
                return None;
            }
        };

        match self.with_timeout(conn.get(key)).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Cache get failed for '{}': {}", key, err);
                self.drop_connection();
                None
            }
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        if !self.config.enabled {
            return false;
        }

        if key.len() > self.config.max_key_bytes {
            log::warn!(
                "Cache key exceeds {} bytes, not storing: '{}'",
                self.config.max_key_bytes,
                key
            );
            return false;
        }

        let mut conn = match self.live_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::debug!("Cache set skipped for '{}': {}", key, err);
                return false;
            }
        };

        match self
            .with_timeout(conn.set_ex::<_, _, ()>(key, value, ttl_seconds))
            .await
        {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Cache set failed for '{}': {}", key, err);
                self.drop_connection();
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut conn = match self.live_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::debug!("Cache delete skipped for '{}': {}", key, err);
                return false;
            }
        };

        match self.with_timeout(conn.del::<_, i64>(key)).await {
            Ok(count) => count > 0,
            Err(err) => {
                log::warn!("Cache delete failed for '{}': {}", key, err);
                self.drop_connection();
                false
            }
        }
    }

    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        if !self.config.enabled {
            return 0;
        }

        let mut conn = match self.live_connection().await {
            Ok(conn) => conn,
            Err(err) => {
                log::debug!("Cache prefix delete skipped for '{}': {}", prefix, err);
                return 0;
            }
        };

        let pattern = format!("{}*", prefix);
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let scanned: Result<(u64, Vec<String>), StoreError> = self
                .with_timeout(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut conn),
                )
                .await;

            let (new_cursor, keys) = match scanned {
                Ok(reply) => reply,
                Err(err) => {
                    log::warn!("Cache scan failed for '{}': {}", pattern, err);
                    self.drop_connection();
                    return total_deleted;
                }
            };

            if !keys.is_empty() {
                match self.with_timeout(conn.del::<_, i64>(&keys)).await {
                    Ok(count) => total_deleted += count as u64,
                    Err(err) => {
                        log::warn!("Cache delete failed under '{}': {}", pattern, err);
                        self.drop_connection();
                        return total_deleted;
                    }
                }
            }

            cursor = new_cursor;
            if cursor == 0 {
                break;
            }
        }

        total_deleted
    }

    async fn stats(&self) -> CacheStoreStats {
        if !self.config.enabled {
            return CacheStoreStats {
                status: "disabled".to_string(),
                ..Default::default()
            };
        }

        let mut conn = match self.live_connection().await {
            Ok(conn) => conn,
            Err(_) => return CacheStoreStats::default(),
        };

        let total_keys: u64 = match self
            .with_timeout(redis::cmd("DBSIZE").query_async(&mut conn))
            .await
        {
            Ok(count) => count,
            Err(err) => {
                log::warn!("Cache stats failed: {}", err);
                self.drop_connection();
                return CacheStoreStats::default();
            }
        };

        let info: String = match self
            .with_timeout(redis::cmd("INFO").query_async(&mut conn))
            .await
        {
            Ok(info) => info,
            Err(err) => {
                log::warn!("Cache stats failed: {}", err);
                self.drop_connection();
                return CacheStoreStats::default();
            }
        };

        CacheStoreStats {
            status: "connected".to_string(),
            total_keys,
            used_memory: info_field(&info, "used_memory_human")
                .or_else(|| info_field(&info, "used_memory"))
                .unwrap_or_else(|| "0".to_string()),
            connected_clients: info_number(&info, "connected_clients"),
            total_commands_processed: info_number(&info, "total_commands_processed"),
            keyspace_hits: info_number(&info, "keyspace_hits"),
            keyspace_misses: info_number(&info, "keyspace_misses"),
        }
    }
}

/// Extract a `field:value` line from a Redis INFO reply.
fn info_field(info: &str, field: &str) -> Option<String> {
    info.lines().find_map(|line| {
        line.strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim().to_string())
    })
}

fn info_number(info: &str, field: &str) -> u64 {
    info_field(info, field)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
