//! In-Process TTL Cache
//!
//! Generic cache-aside store with lazy expiry. One instance is created at
//! process start and injected into handlers; there is no ambient global
//! state, so tests construct isolated instances.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Time-bounded cache for computed values
///
/// `get` on an expired entry deletes it and behaves as a miss; stale data
/// is never returned. `put` fully replaces any existing entry.
pub struct TtlCache<V>
where
    V: Clone + Send + Sync,
{
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a live value, lazily deleting an expired one
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= Instant::now() {
                entries.remove(key);
            }
        }
        None
    }

    /// Store a value, fully replacing any previous entry for the key
    pub async fn put(&self, key: &str, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove every entry whose key starts with the prefix
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Remove every expired entry; for background cleanup
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Live entry count, for tests and diagnostics
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
