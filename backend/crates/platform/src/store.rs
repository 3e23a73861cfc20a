//! Durable Key-Value Store Infrastructure
//!
//! The only shared state between request invocations is an external,
//! eventually-consistent key-value store. This module defines that
//! capability as a trait with two backends selected at construction time:
//! a remote Redis store and an in-process map for environments without one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tokio::sync::RwLock;

/// Error when talking to the durable store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer within the configured bound
    #[error("store operation timed out")]
    Timeout,
}

/// Trait for durable key-value store backends
///
/// Writes may not be immediately visible to reads from another process;
/// callers must tolerate stale values.
#[trait_variant::make(DurableStore: Send)]
pub trait LocalDurableStore {
    /// Fetch the value for a key, or None if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any previous one, expiring after `ttl_secs`
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;
}

// ============================================================================
// Redis backend
// ============================================================================

/// Remote store backed by Redis
///
/// Timeouts are bounded at connection-manager level so a dead store can
/// never hang a request.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis with bounded connection and response timeouts
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(250))
            .set_response_timeout(Duration::from_millis(250));

        let client =
            redis::Client::open(redis_url).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let conn = client
            .get_connection_manager_with_config(config)
            .await
            .map_err(map_redis_error)?;

        Ok(Self { conn })
    }
}

impl DurableStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

fn map_redis_error(err: redis::RedisError) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Fraction of writes that trigger a full sweep of expired entries
const SWEEP_PROBABILITY: f64 = 0.01;

/// In-process store for local/dev execution without Redis
///
/// Expired entries are dropped lazily on read; a low-probability sweep on
/// write bounds memory for keys that are never read again. Safe to share
/// across tasks (clone is cheap).
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unswept) entries, for tests and diagnostics
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drop every fully-expired entry
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at > now);
        before - entries.len()
    }
}

impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(stored) if stored.expires_at > Instant::now() => {
                    return Ok(Some(stored.value.clone()));
                }
                Some(_) => {}
            }
        }

        // Entry existed but expired: remove it under a write lock.
        let mut entries = self.entries.write().await;
        if let Some(stored) = entries.get(key) {
            if stored.expires_at <= Instant::now() {
                entries.remove(key);
            }
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );

        if rand::random::<f64>() < SWEEP_PROBABILITY {
            let now = Instant::now();
            let before = entries.len();
            entries.retain(|_, stored| stored.expires_at > now);
            let swept = before - entries.len();
            if swept > 0 {
                tracing::debug!(swept, "Swept expired store entries");
            }
        }

        Ok(())
    }
}
