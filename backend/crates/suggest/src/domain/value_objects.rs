//! Domain Value Objects
//!
//! Immutable value types for suggestion ranking.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket for contextual matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    /// Before 12:00
    Morning,
    /// 12:00 to 16:59
    Afternoon,
    /// 17:00 onward
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            TimeOfDay::Morning
        } else if hour < 17 {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }

    pub fn from_datetime(at: &DateTime<Utc>) -> Self {
        Self::from_hour(at.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

/// Bucket sizes and thresholds for the ranking algorithm
#[derive(Debug, Clone)]
pub struct BucketLimits {
    /// Cap for the recent bucket
    pub recent_cap: usize,
    /// Cap for the frequent bucket
    pub frequent_cap: usize,
    /// Cap for the contextual bucket
    pub contextual_cap: usize,
    /// Minimum frequency for the frequent bucket
    pub frequent_min: u32,
    /// Days back that still count as recent
    pub recent_window_days: i64,
}

impl Default for BucketLimits {
    fn default() -> Self {
        Self {
            recent_cap: 5,
            frequent_cap: 5,
            contextual_cap: 3,
            frequent_min: 2,
            recent_window_days: 7,
        }
    }
}
