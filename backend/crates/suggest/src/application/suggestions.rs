//! Ranked Suggestions Use Case

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::application::config::SuggestConfig;
use crate::domain::entities::SuggestionBuckets;
use crate::domain::repository::HistoryRepository;
use crate::domain::services::{normalize, rank_suggestions};
use crate::domain::value_objects::TimeOfDay;
use crate::error::{SuggestError, SuggestResult};
use crate::infra::ttl_cache::TtlCache;

/// Input for one suggestion request
#[derive(Debug, Clone)]
pub struct SuggestionParams {
    pub tenant_id: Uuid,
    pub field: String,
    /// What the user has already typed; never suggested back
    pub current_value: Option<String>,
    pub actor_id: Option<Uuid>,
}

/// Output of one suggestion request
#[derive(Debug, Clone)]
pub struct SuggestionOutput {
    pub buckets: SuggestionBuckets,
    pub from_cache: bool,
    /// Rows inspected on a miss (zero on a hit)
    pub considered: usize,
    /// Rows skipped as unparsable on a miss
    pub skipped: usize,
}

/// Ranked Suggestions Use Case
///
/// Cache-aside: a hit returns the stored buckets verbatim and skips the
/// history read and ranking entirely.
pub struct SuggestionsUseCase<H>
where
    H: HistoryRepository,
{
    history: Arc<H>,
    cache: Arc<TtlCache<SuggestionBuckets>>,
    config: Arc<SuggestConfig>,
}

impl<H> SuggestionsUseCase<H>
where
    H: HistoryRepository,
{
    pub fn new(
        history: Arc<H>,
        cache: Arc<TtlCache<SuggestionBuckets>>,
        config: Arc<SuggestConfig>,
    ) -> Self {
        Self {
            history,
            cache,
            config,
        }
    }

    pub async fn execute(&self, params: SuggestionParams) -> SuggestResult<SuggestionOutput> {
        let field = params.field.trim().to_lowercase();
        if field.is_empty() {
            return Err(SuggestError::InvalidRequest("field is required".to_string()));
        }

        let now = Utc::now();
        let key = cache_key(
            params.tenant_id,
            &field,
            params.actor_id,
            TimeOfDay::from_datetime(&now),
            params.current_value.as_deref(),
        );

        if let Some(buckets) = self.cache.get(&key).await {
            tracing::debug!(tenant_id = %params.tenant_id, field = %field, "Suggestion cache hit");
            return Ok(SuggestionOutput {
                buckets,
                from_cache: true,
                considered: 0,
                skipped: 0,
            });
        }

        // A failing history source is an error, not an empty result.
        let rows = self
            .history
            .recent(params.tenant_id, self.config.history_sample)
            .await?;

        let ranking = rank_suggestions(
            &rows,
            &field,
            params.current_value.as_deref(),
            params.actor_id,
            now,
            &self.config.limits,
        );

        if ranking.skipped > 0 {
            tracing::debug!(
                tenant_id = %params.tenant_id,
                field = %field,
                skipped = ranking.skipped,
                "Skipped unparsable history rows"
            );
        }

        self.cache
            .put(&key, ranking.buckets.clone(), self.config.suggestion_ttl)
            .await;

        Ok(SuggestionOutput {
            buckets: ranking.buckets,
            from_cache: false,
            considered: ranking.considered,
            skipped: ranking.skipped,
        })
    }

    /// Drop every cached suggestion set for a tenant
    ///
    /// Must be called on any write to the tenant's records so stale
    /// suggestions are never served after new data arrives.
    pub async fn invalidate_tenant(&self, tenant_id: Uuid) -> usize {
        let dropped = self
            .cache
            .invalidate_prefix(&format!("{}:", tenant_id))
            .await;
        if dropped > 0 {
            tracing::debug!(tenant_id = %tenant_id, dropped, "Invalidated suggestion cache");
        }
        dropped
    }
}

/// Cache key: tenant first so prefix invalidation clears one household
fn cache_key(
    tenant_id: Uuid,
    field: &str,
    actor_id: Option<Uuid>,
    bucket: TimeOfDay,
    current_value: Option<&str>,
) -> String {
    let actor = actor_id.map(|id| id.to_string()).unwrap_or_default();
    let current = current_value.map(normalize).unwrap_or_default();
    format!(
        "{}:{}:{}:{}:{}",
        tenant_id,
        field,
        actor,
        bucket.as_str(),
        current
    )
}
