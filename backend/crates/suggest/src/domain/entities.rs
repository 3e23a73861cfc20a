//! Domain Entities
//!
//! History records and the ranked suggestions derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::TimeOfDay;

/// One historical entry for a household
///
/// The content blob is opaque to this crate beyond "a JSON object whose
/// string fields can be suggested".
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl HistoryRecord {
    /// Create a new record stamped now
    pub fn new(
        tenant_id: Uuid,
        actor_id: Option<Uuid>,
        actor_label: Option<String>,
        content: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            actor_id,
            actor_label,
            created_at: Utc::now(),
            content,
        }
    }
}

/// Context carried with a suggestion for contextual matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionContext {
    pub actor_id: Option<Uuid>,
    pub actor_label: Option<String>,
    pub time_of_day: TimeOfDay,
}

/// One ranked suggestion
///
/// Two suggestions with the same case-insensitive normalized value are
/// always merged: frequencies sum, the most recent last-used and context
/// win. Duplicates never appear in output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSuggestion {
    /// Case-folded, NFKC-normalized value used for dedup
    pub normalized: String,
    /// The value as the user most recently typed it
    pub display: String,
    pub frequency: u32,
    pub last_used: DateTime<Utc>,
    pub context: SuggestionContext,
}

/// The three output buckets plus their source parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBuckets {
    pub field: String,
    pub recent: Vec<RankedSuggestion>,
    pub frequent: Vec<RankedSuggestion>,
    pub contextual: Vec<RankedSuggestion>,
}

impl SuggestionBuckets {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.frequent.is_empty() && self.contextual.is_empty()
    }
}
