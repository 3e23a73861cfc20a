//! Domain Services
//!
//! Pure ranking logic over a bounded, most-recent-first history sample.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::domain::entities::{
    HistoryRecord, RankedSuggestion, SuggestionBuckets, SuggestionContext,
};
use crate::domain::value_objects::{BucketLimits, TimeOfDay};

/// Result of one ranking pass
#[derive(Debug, Clone)]
pub struct Ranking {
    pub buckets: SuggestionBuckets,
    /// Rows inspected
    pub considered: usize,
    /// Rows dropped because the payload or field did not parse
    pub skipped: usize,
}

/// Canonical form used for dedup: NFKC, trimmed, case-folded
pub fn normalize(raw: &str) -> String {
    raw.nfkc().collect::<String>().trim().to_lowercase()
}

/// Extract the target field from a record's content blob
///
/// Only non-empty string values count; anything else is a parse failure
/// for this row.
pub fn extract_field(content: &str, field: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let raw = value.get(field)?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.to_string())
}

/// Rank a history sample into the three suggestion buckets
///
/// - Recent: last used within the recent window, newest first
/// - Frequent: seen at least `frequent_min` times, by frequency then
///   recency
/// - Contextual: same actor or same time-of-day bucket as the request,
///   excluding anything already selected above
///
/// A candidate equal to the caller's current value never appears.
/// Malformed rows are skipped silently; they never abort the pass.
pub fn rank_suggestions(
    rows: &[HistoryRecord],
    field: &str,
    current_value: Option<&str>,
    requesting_actor: Option<Uuid>,
    now: DateTime<Utc>,
    limits: &BucketLimits,
) -> Ranking {
    let current_norm = current_value.map(normalize).filter(|v| !v.is_empty());

    let mut merged: HashMap<String, RankedSuggestion> = HashMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(value) = extract_field(&row.content, field) else {
            skipped += 1;
            continue;
        };

        let normalized = normalize(&value);
        if normalized.is_empty() {
            skipped += 1;
            continue;
        }

        if current_norm.as_deref() == Some(normalized.as_str()) {
            continue;
        }

        match merged.entry(normalized) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.frequency += 1;
                // Rows arrive most-recent-first, but merging must not
                // depend on that ordering.
                if row.created_at > existing.last_used {
                    existing.last_used = row.created_at;
                    existing.display = value;
                    existing.context = context_of(row);
                }
            }
            Entry::Vacant(entry) => {
                let normalized = entry.key().clone();
                entry.insert(RankedSuggestion {
                    normalized,
                    display: value,
                    frequency: 1,
                    last_used: row.created_at,
                    context: context_of(row),
                });
            }
        }
    }

    let all: Vec<RankedSuggestion> = merged.into_values().collect();

    let recent_cutoff = now - Duration::days(limits.recent_window_days);
    let mut recent: Vec<RankedSuggestion> = all
        .iter()
        .filter(|s| s.last_used >= recent_cutoff)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    recent.truncate(limits.recent_cap);

    let mut frequent: Vec<RankedSuggestion> = all
        .iter()
        .filter(|s| s.frequency >= limits.frequent_min)
        .cloned()
        .collect();
    frequent.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(b.last_used.cmp(&a.last_used))
    });
    frequent.truncate(limits.frequent_cap);

    let selected: HashSet<&str> = recent
        .iter()
        .chain(frequent.iter())
        .map(|s| s.normalized.as_str())
        .collect();

    let current_bucket = TimeOfDay::from_datetime(&now);
    let mut contextual: Vec<RankedSuggestion> = all
        .iter()
        .filter(|s| !selected.contains(s.normalized.as_str()))
        .filter(|s| {
            let actor_match = requesting_actor.is_some() && s.context.actor_id == requesting_actor;
            actor_match || s.context.time_of_day == current_bucket
        })
        .cloned()
        .collect();
    contextual.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(b.last_used.cmp(&a.last_used))
    });
    contextual.truncate(limits.contextual_cap);

    Ranking {
        buckets: SuggestionBuckets {
            field: field.to_string(),
            recent,
            frequent,
            contextual,
        },
        considered: rows.len(),
        skipped,
    }
}

fn context_of(row: &HistoryRecord) -> SuggestionContext {
    SuggestionContext {
        actor_id: row.actor_id,
        actor_label: row.actor_label.clone(),
        time_of_day: TimeOfDay::from_datetime(&row.created_at),
    }
}
