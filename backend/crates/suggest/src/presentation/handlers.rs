//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use platform::store::DurableStore;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::insights::{InsightSource, InsightsUseCase};
use crate::application::suggestions::{SuggestionParams, SuggestionsUseCase};
use crate::domain::entities::HistoryRecord;
use crate::domain::repository::HistoryRepository;
use crate::error::{SuggestError, SuggestResult};
use crate::presentation::dto::{
    CreateRecordRequest, InsightsResponse, RecordCreatedResponse, SuggestQuery, SuggestResponse,
    SuggestionDto,
};

/// Shared state for suggest handlers
#[derive(Clone)]
pub struct SuggestAppState<H, S, G>
where
    H: HistoryRepository + Clone + Send + Sync + 'static,
    S: DurableStore + Clone + Send + Sync + 'static,
    G: InsightSource + Clone + Send + Sync + 'static,
{
    pub suggestions: Arc<SuggestionsUseCase<H>>,
    pub insights: Arc<InsightsUseCase<S, G>>,
    pub history: Arc<H>,
}

/// GET /tenants/{tenant_id}/suggest
pub async fn get_suggestions<H, S, G>(
    State(state): State<SuggestAppState<H, S, G>>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<SuggestQuery>,
) -> SuggestResult<Json<SuggestResponse>>
where
    H: HistoryRepository + Clone + Send + Sync + 'static,
    S: DurableStore + Clone + Send + Sync + 'static,
    G: InsightSource + Clone + Send + Sync + 'static,
{
    let output = state
        .suggestions
        .execute(SuggestionParams {
            tenant_id,
            field: query.field,
            current_value: query.current_value,
            actor_id: query.actor_id,
        })
        .await?;

    Ok(Json(SuggestResponse {
        field: output.buckets.field.clone(),
        recent: output.buckets.recent.iter().map(SuggestionDto::from).collect(),
        frequent: output
            .buckets
            .frequent
            .iter()
            .map(SuggestionDto::from)
            .collect(),
        contextual: output
            .buckets
            .contextual
            .iter()
            .map(SuggestionDto::from)
            .collect(),
        from_cache: output.from_cache,
    }))
}

/// POST /tenants/{tenant_id}/records
///
/// Thin record-write glue: appends the record, then invalidates the
/// tenant's cached suggestions so stale sets are never served after new
/// data arrives.
pub async fn create_record<H, S, G>(
    State(state): State<SuggestAppState<H, S, G>>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateRecordRequest>,
) -> SuggestResult<impl IntoResponse>
where
    H: HistoryRepository + Clone + Send + Sync + 'static,
    S: DurableStore + Clone + Send + Sync + 'static,
    G: InsightSource + Clone + Send + Sync + 'static,
{
    if !req.content.is_object() {
        return Err(SuggestError::InvalidRequest(
            "content must be a JSON object".to_string(),
        ));
    }

    let record = HistoryRecord::new(
        tenant_id,
        req.actor_id,
        req.actor_label,
        req.content.to_string(),
    );

    state.history.append(&record).await?;
    let invalidated = state.suggestions.invalidate_tenant(tenant_id).await;

    Ok((
        StatusCode::CREATED,
        Json(RecordCreatedResponse {
            record_id: record.id,
            invalidated,
        }),
    ))
}

/// GET /tenants/{tenant_id}/insights
pub async fn get_insights<H, S, G>(
    State(state): State<SuggestAppState<H, S, G>>,
    Path(tenant_id): Path<Uuid>,
) -> SuggestResult<Json<InsightsResponse>>
where
    H: HistoryRepository + Clone + Send + Sync + 'static,
    S: DurableStore + Clone + Send + Sync + 'static,
    G: InsightSource + Clone + Send + Sync + 'static,
{
    let output = state.insights.execute(tenant_id).await?;

    Ok(Json(InsightsResponse {
        artifact: output.artifact,
        from_cache: output.from_cache,
    }))
}
