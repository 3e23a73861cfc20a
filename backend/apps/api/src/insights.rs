//! Insight Source Glue
//!
//! Stand-in insight producer: a small summary over the recent history
//! sample. The artifact is opaque to the cache; swapping in a richer
//! producer touches nothing else.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use suggest::application::insights::InsightSource;
use suggest::domain::repository::HistoryRepository;
use suggest::domain::services::{extract_field, normalize};
use suggest::error::SuggestResult;
use uuid::Uuid;

/// How many recent records feed the summary
const SAMPLE_SIZE: u32 = 75;

/// How many categories the summary lists
const TOP_CATEGORIES: usize = 5;

#[derive(Clone)]
pub struct HistorySummarySource<H>
where
    H: HistoryRepository + Clone + Send + Sync,
{
    history: Arc<H>,
}

impl<H> HistorySummarySource<H>
where
    H: HistoryRepository + Clone + Send + Sync,
{
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }
}

impl<H> InsightSource for HistorySummarySource<H>
where
    H: HistoryRepository + Clone + Send + Sync,
{
    async fn compute(&self, tenant_id: Uuid) -> SuggestResult<serde_json::Value> {
        let rows = self.history.recent(tenant_id, SAMPLE_SIZE).await?;

        let mut categories: HashMap<String, u32> = HashMap::new();
        for row in &rows {
            if let Some(value) = extract_field(&row.content, "category") {
                *categories.entry(normalize(&value)).or_insert(0) += 1;
            }
        }

        let mut top: Vec<(String, u32)> = categories.into_iter().collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        top.truncate(TOP_CATEGORIES);

        Ok(serde_json::json!({
            "generatedAtMs": Utc::now().timestamp_millis(),
            "sampleSize": rows.len(),
            "topCategories": top
                .into_iter()
                .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                .collect::<Vec<_>>(),
        }))
    }
}
