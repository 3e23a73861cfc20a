//! Repository Traits
//!
//! Interfaces for the history source. Implementation is in the
//! infrastructure layer.

use crate::domain::entities::HistoryRecord;
use crate::error::SuggestResult;
use uuid::Uuid;

/// History source trait
///
/// The read side is a paged, most-recent-first query; the schema behind
/// it is not this crate's concern beyond one record per entry with a
/// timestamp and an opaque content blob.
#[trait_variant::make(HistoryRepository: Send)]
pub trait LocalHistoryRepository {
    /// Most-recent-first sample of records for a tenant
    async fn recent(&self, tenant_id: Uuid, limit: u32) -> SuggestResult<Vec<HistoryRecord>>;

    /// Append a record
    async fn append(&self, record: &HistoryRecord) -> SuggestResult<()>;
}
