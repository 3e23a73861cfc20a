//! PostgreSQL History Repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::HistoryRecord;
use crate::domain::repository::HistoryRepository;
use crate::error::SuggestResult;

/// PostgreSQL-backed history source
#[derive(Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HistoryRepository for PgHistoryRepository {
    async fn recent(&self, tenant_id: Uuid, limit: u32) -> SuggestResult<Vec<HistoryRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT
                record_id,
                tenant_id,
                actor_id,
                actor_label,
                created_at,
                content
            FROM records
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    async fn append(&self, record: &HistoryRecord) -> SuggestResult<()> {
        sqlx::query(
            r#"
            INSERT INTO records (
                record_id,
                tenant_id,
                actor_id,
                actor_label,
                created_at,
                content
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.tenant_id)
        .bind(record.actor_id)
        .bind(&record.actor_label)
        .bind(record.created_at)
        .bind(&record.content)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            record_id = %record.id,
            tenant_id = %record.tenant_id,
            "Record appended"
        );

        Ok(())
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct RecordRow {
    record_id: Uuid,
    tenant_id: Uuid,
    actor_id: Option<Uuid>,
    actor_label: Option<String>,
    created_at: DateTime<Utc>,
    content: String,
}

impl RecordRow {
    fn into_record(self) -> HistoryRecord {
        HistoryRecord {
            id: self.record_id,
            tenant_id: self.tenant_id,
            actor_id: self.actor_id,
            actor_label: self.actor_label,
            created_at: self.created_at,
            content: self.content,
        }
    }
}
