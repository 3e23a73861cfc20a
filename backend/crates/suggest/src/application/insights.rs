//! Cached Insights Use Case
//!
//! The insight *content* is produced by an external collaborator behind
//! [`InsightSource`]; this use case only decides whether the stored
//! artifact can be served instead of recomputing.

use std::sync::Arc;

use platform::store::DurableStore;
use uuid::Uuid;

use crate::application::config::SuggestConfig;
use crate::error::SuggestResult;
use crate::infra::artifact_cache::ArtifactCache;

/// Producer of insight artifacts. The payload is opaque to the cache.
#[trait_variant::make(InsightSource: Send)]
pub trait LocalInsightSource {
    /// Compute the artifact for a tenant
    async fn compute(&self, tenant_id: Uuid) -> SuggestResult<serde_json::Value>;
}

/// Output of one insights request
#[derive(Debug, Clone)]
pub struct InsightOutput {
    pub artifact: serde_json::Value,
    pub from_cache: bool,
}

/// Cached Insights Use Case
pub struct InsightsUseCase<S, G>
where
    S: DurableStore,
    G: InsightSource,
{
    cache: ArtifactCache<S>,
    source: Arc<G>,
    config: Arc<SuggestConfig>,
}

impl<S, G> InsightsUseCase<S, G>
where
    S: DurableStore,
    G: InsightSource,
{
    pub fn new(store: Arc<S>, source: Arc<G>, config: Arc<SuggestConfig>) -> Self {
        Self {
            cache: ArtifactCache::new(store),
            source,
            config,
        }
    }

    /// Serve the cached artifact, or compute and cache it
    ///
    /// A corrupt cached payload regenerates; a store read failure
    /// propagates. A store write failure after a successful computation
    /// only costs the caching: the fresh artifact is still returned.
    pub async fn execute(&self, tenant_id: Uuid) -> SuggestResult<InsightOutput> {
        let key = format!("insight:{}", tenant_id);

        if let Some(artifact) = self.cache.get::<serde_json::Value>(&key).await? {
            tracing::debug!(tenant_id = %tenant_id, "Insight cache hit");
            return Ok(InsightOutput {
                artifact,
                from_cache: true,
            });
        }

        let artifact = self.source.compute(tenant_id).await?;

        if let Err(e) = self
            .cache
            .put(&key, &artifact, self.config.artifact_ttl_secs())
            .await
        {
            tracing::warn!(tenant_id = %tenant_id, error = %e, "Insight cache write failed");
        }

        Ok(InsightOutput {
            artifact,
            from_cache: false,
        })
    }
}
