//! Domain Entities
//!
//! The rate-window record persisted to the durable store.

use serde::{Deserialize, Serialize};

/// Sliding-window record for one caller identifier
///
/// Owned exclusively by the store entry for that identifier. Read-modify-
/// write is not atomic across concurrent requests; the record is a
/// best-effort approximation of the true count, not an exact one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateWindowRecord {
    /// Epoch-millisecond timestamps of requests inside the current window
    pub timestamps: Vec<i64>,
    /// When this record was last written to the store, if ever
    pub last_persisted_ms: Option<i64>,
}

impl RateWindowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored record. Corrupt payloads are treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Serialize for the store
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Drop timestamps older than the window
    pub fn prune(&mut self, now_ms: i64, window_ms: i64) {
        let cutoff = now_ms - window_ms;
        self.timestamps.retain(|&ts| ts > cutoff);
    }

    /// Record the current request
    pub fn observe(&mut self, now_ms: i64) {
        self.timestamps.push(now_ms);
    }

    /// Requests currently inside the window
    pub fn count(&self) -> u32 {
        self.timestamps.len() as u32
    }

    /// When the window resets: the oldest observation plus the window
    pub fn reset_at_ms(&self, now_ms: i64, window_ms: i64) -> i64 {
        match self.timestamps.first() {
            Some(&oldest) => oldest + window_ms,
            None => now_ms + window_ms,
        }
    }

    /// Whether this update should be written back to the store
    ///
    /// Persistence is skipped unless no prior write exists, the persist
    /// interval has elapsed, or the count has crossed 80% of the limit.
    /// This caps write amplification at the cost of short-term
    /// undercounting; a zero interval persists every increment.
    pub fn should_persist(&self, now_ms: i64, persist_interval_ms: i64, max_count: u32) -> bool {
        let Some(last) = self.last_persisted_ms else {
            return true;
        };
        if now_ms - last >= persist_interval_ms {
            return true;
        }
        self.count() as u64 * 5 >= max_count as u64 * 4
    }

    /// Mark the record as written now
    pub fn mark_persisted(&mut self, now_ms: i64) {
        self.last_persisted_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_drops_old_timestamps() {
        let mut record = RateWindowRecord::new();
        record.timestamps = vec![1_000, 30_000, 59_000, 61_000];
        record.prune(61_000, 60_000);
        assert_eq!(record.timestamps, vec![30_000, 59_000, 61_000]);
    }

    #[test]
    fn test_observe_and_count() {
        let mut record = RateWindowRecord::new();
        record.observe(1_000);
        record.observe(2_000);
        assert_eq!(record.count(), 2);
    }

    #[test]
    fn test_reset_at_tracks_oldest() {
        let mut record = RateWindowRecord::new();
        assert_eq!(record.reset_at_ms(5_000, 60_000), 65_000);

        record.observe(10_000);
        record.observe(20_000);
        assert_eq!(record.reset_at_ms(25_000, 60_000), 70_000);
    }

    #[test]
    fn test_should_persist_first_write() {
        let mut record = RateWindowRecord::new();
        record.observe(1_000);
        assert!(record.should_persist(1_000, 30_000, 100));
    }

    #[test]
    fn test_should_persist_interval_elapsed() {
        let mut record = RateWindowRecord::new();
        record.observe(1_000);
        record.mark_persisted(1_000);

        assert!(!record.should_persist(10_000, 30_000, 100));
        assert!(record.should_persist(31_000, 30_000, 100));
    }

    #[test]
    fn test_should_persist_near_limit() {
        let mut record = RateWindowRecord::new();
        for ts in 0..8 {
            record.observe(ts);
        }
        record.mark_persisted(7);

        // 8 of 10 is exactly the 80% threshold
        assert!(record.should_persist(8, 30_000, 10));

        let mut below = RateWindowRecord::new();
        for ts in 0..7 {
            below.observe(ts);
        }
        below.mark_persisted(6);
        assert!(!below.should_persist(7, 30_000, 10));
    }

    #[test]
    fn test_zero_interval_always_persists() {
        let mut record = RateWindowRecord::new();
        record.observe(1_000);
        record.mark_persisted(1_000);
        assert!(record.should_persist(1_000, 0, 100));
    }

    #[test]
    fn test_parse_corrupt_payload() {
        assert!(RateWindowRecord::parse("not json").is_none());
        assert!(RateWindowRecord::parse("{\"timestamps\":\"nope\"}").is_none());

        let record = RateWindowRecord::parse("{\"timestamps\":[1,2],\"last_persisted_ms\":2}");
        assert_eq!(record.unwrap().count(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut record = RateWindowRecord::new();
        record.observe(42);
        record.mark_persisted(42);

        let json = record.to_json().unwrap();
        let parsed = RateWindowRecord::parse(&json).unwrap();
        assert_eq!(parsed.timestamps, vec![42]);
        assert_eq!(parsed.last_persisted_ms, Some(42));
    }
}
