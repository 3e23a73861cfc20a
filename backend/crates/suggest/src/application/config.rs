//! Application Configuration
//!
//! Configuration for the suggest application layer.

use std::time::Duration;

use crate::domain::value_objects::BucketLimits;

/// Suggest application configuration
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Cap on the most-recent-first history sample fed to ranking
    pub history_sample: u32,
    /// TTL for cached suggestion buckets (independent of the
    /// relational read)
    pub suggestion_ttl: Duration,
    /// TTL for cached insight artifacts
    pub artifact_ttl: Duration,
    /// Bucket sizes and thresholds
    pub limits: BucketLimits,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            history_sample: 75,
            suggestion_ttl: Duration::from_secs(300),
            artifact_ttl: Duration::from_secs(3600),
            limits: BucketLimits::default(),
        }
    }
}

impl SuggestConfig {
    /// Create config for development: short TTLs so edits show up fast
    pub fn development() -> Self {
        Self {
            suggestion_ttl: Duration::from_secs(15),
            artifact_ttl: Duration::from_secs(60),
            ..Default::default()
        }
    }

    pub fn artifact_ttl_secs(&self) -> u64 {
        self.artifact_ttl.as_secs()
    }
}
