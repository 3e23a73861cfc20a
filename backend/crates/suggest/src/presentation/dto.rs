//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::RankedSuggestion;

/// Query for GET /tenants/{tenant_id}/suggest
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestQuery {
    pub field: String,
    #[serde(default)]
    pub current_value: Option<String>,
    #[serde(default)]
    pub actor_id: Option<Uuid>,
}

/// One suggestion on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDto {
    pub value: String,
    pub frequency: u32,
    pub last_used_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_label: Option<String>,
}

impl From<&RankedSuggestion> for SuggestionDto {
    fn from(suggestion: &RankedSuggestion) -> Self {
        Self {
            value: suggestion.display.clone(),
            frequency: suggestion.frequency,
            last_used_ms: suggestion.last_used.timestamp_millis(),
            actor_label: suggestion.context.actor_label.clone(),
        }
    }
}

/// Response for GET /tenants/{tenant_id}/suggest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub field: String,
    pub recent: Vec<SuggestionDto>,
    pub frequent: Vec<SuggestionDto>,
    pub contextual: Vec<SuggestionDto>,
    pub from_cache: bool,
}

/// Request for POST /tenants/{tenant_id}/records
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub content: serde_json::Value,
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    #[serde(default)]
    pub actor_label: Option<String>,
}

/// Response for POST /tenants/{tenant_id}/records
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCreatedResponse {
    pub record_id: Uuid,
    /// Cached suggestion sets dropped by the write
    pub invalidated: usize,
}

/// Response for GET /tenants/{tenant_id}/insights
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub artifact: serde_json::Value,
    pub from_cache: bool,
}
