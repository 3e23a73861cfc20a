//! Store-Backed Window Counter
//!
//! Sliding-window request counter over the durable key-value store.
//! Concurrent increments for the same identifier are not serialized;
//! lost updates are accepted. Store failures resolve to the caller's
//! fail-open/fail-closed policy and are never raised.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use platform::store::DurableStore;
use tokio::time::timeout;

use crate::domain::entities::RateWindowRecord;
use crate::domain::value_objects::AdmissionDecision;

/// Retry-After returned when a fail-closed rule hits a store failure
const FAIL_CLOSED_RETRY_SECS: u32 = 30;

/// Sliding-window counter keyed by an identifier
pub struct WindowCounter<S>
where
    S: DurableStore,
{
    store: Arc<S>,
    persist_interval: Duration,
    store_timeout: Duration,
}

impl<S> WindowCounter<S>
where
    S: DurableStore,
{
    pub fn new(store: Arc<S>, persist_interval: Duration, store_timeout: Duration) -> Self {
        Self {
            store,
            persist_interval,
            store_timeout,
        }
    }

    /// Count this request against the identifier's window and decide
    ///
    /// Reads the stored record (a corrupt or absent record starts a fresh
    /// window), prunes timestamps outside the window, appends the current
    /// instant, and allows iff the resulting count is within `max_count`.
    /// The updated record is written back only when the persistence
    /// heuristic says so, capping write amplification on the store.
    pub async fn increment_and_check(
        &self,
        key: &str,
        window_ms: i64,
        max_count: u32,
        skip_on_error: bool,
    ) -> AdmissionDecision {
        let now_ms = Utc::now().timestamp_millis();

        let raw = match timeout(self.store_timeout, self.store.get(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Window counter read failed");
                return self.degraded(skip_on_error, max_count, window_ms, now_ms);
            }
            Err(_) => {
                tracing::warn!("Window counter read timed out");
                return self.degraded(skip_on_error, max_count, window_ms, now_ms);
            }
        };

        let mut record = raw
            .as_deref()
            .and_then(RateWindowRecord::parse)
            .unwrap_or_default();

        record.prune(now_ms, window_ms);
        record.observe(now_ms);

        let count = record.count();
        let reset_at_ms = record.reset_at_ms(now_ms, window_ms);

        let decision = if count <= max_count {
            AdmissionDecision::allow(max_count, max_count - count, reset_at_ms)
        } else {
            let retry_after = ((reset_at_ms - now_ms + 999) / 1000).max(1) as u32;
            AdmissionDecision::deny(max_count, reset_at_ms, retry_after)
        };

        if record.should_persist(now_ms, self.persist_interval.as_millis() as i64, max_count) {
            record.mark_persisted(now_ms);
            self.persist(key, &record, window_ms).await;
        }

        decision
    }

    /// Write the record back. Fire-and-forget safe: failures are logged
    /// and the already-computed decision stands.
    async fn persist(&self, key: &str, record: &RateWindowRecord, window_ms: i64) {
        let Some(json) = record.to_json() else {
            tracing::warn!("Window record failed to serialize");
            return;
        };

        // The entry only needs to outlive the window it describes.
        let ttl_secs = (window_ms.max(0) as u64) / 1000 + self.persist_interval.as_secs() + 1;

        match timeout(self.store_timeout, self.store.put(key, &json, ttl_secs)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Window counter write failed"),
            Err(_) => tracing::warn!("Window counter write timed out"),
        }
    }

    /// Decision when the store is unreachable
    fn degraded(
        &self,
        skip_on_error: bool,
        max_count: u32,
        window_ms: i64,
        now_ms: i64,
    ) -> AdmissionDecision {
        if skip_on_error {
            AdmissionDecision::allow(max_count, max_count.saturating_sub(1), now_ms + window_ms)
        } else {
            AdmissionDecision::deny(max_count, now_ms + window_ms, FAIL_CLOSED_RETRY_SECS)
        }
    }
}
