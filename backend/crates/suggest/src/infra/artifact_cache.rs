//! Durable Artifact Cache
//!
//! Cache-aside store over the durable key-value store for opaque computed
//! artifacts. A payload that fails to parse is a miss (the artifact gets
//! regenerated); a store failure is an error, so callers can distinguish
//! "need to recompute" from "cache is broken".

use std::sync::Arc;

use platform::store::DurableStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{SuggestError, SuggestResult};

/// Cache for opaque computed artifacts
pub struct ArtifactCache<S>
where
    S: DurableStore,
{
    store: Arc<S>,
}

impl<S> ArtifactCache<S>
where
    S: DurableStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch and parse a cached artifact
    ///
    /// Corrupt payloads are logged and reported as a miss. Store errors
    /// propagate.
    pub async fn get<T>(&self, key: &str) -> SuggestResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Corrupt cached artifact, treating as miss");
                Ok(None)
            }
        }
    }

    /// Serialize and store an artifact with a TTL
    pub async fn put<T>(&self, key: &str, value: &T, ttl_secs: u64) -> SuggestResult<()>
    where
        T: Serialize,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| SuggestError::Internal(format!("artifact serialization failed: {}", e)))?;
        self.store.put(key, &raw, ttl_secs).await?;
        Ok(())
    }
}
