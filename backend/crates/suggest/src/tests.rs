//! Unit tests for the suggest crate

#[cfg(test)]
mod ranking_tests {
    use crate::domain::entities::HistoryRecord;
    use crate::domain::services::rank_suggestions;
    use crate::domain::value_objects::BucketLimits;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn row(tenant: Uuid, value: &str, at: DateTime<Utc>) -> HistoryRecord {
        row_with_actor(tenant, value, at, None)
    }

    fn row_with_actor(
        tenant: Uuid,
        value: &str,
        at: DateTime<Utc>,
        actor_id: Option<Uuid>,
    ) -> HistoryRecord {
        HistoryRecord {
            id: Uuid::new_v4(),
            tenant_id: tenant,
            actor_id,
            actor_label: actor_id.map(|_| "Alex".to_string()),
            created_at: at,
            content: format!(r#"{{"category":"{}"}}"#, value),
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_dedup_merges_case_insensitively() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        let rows = vec![
            row(tenant, "Soccer ", at(2025, 6, 9, 10)),
            row(tenant, "soccer", at(2025, 6, 8, 10)),
        ];

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert_eq!(ranking.buckets.recent.len(), 1);
        let merged = &ranking.buckets.recent[0];
        assert_eq!(merged.frequency, 2);
        assert_eq!(merged.display, "Soccer");
        assert_eq!(merged.last_used, at(2025, 6, 9, 10));
    }

    #[test]
    fn test_current_value_never_suggested() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        let rows = vec![
            row(tenant, "soccer", at(2025, 6, 9, 10)),
            row(tenant, "Tennis", at(2025, 6, 8, 10)),
        ];

        let ranking = rank_suggestions(
            &rows,
            "category",
            Some("Soccer"),
            None,
            now,
            &BucketLimits::default(),
        );

        let everything: Vec<&str> = ranking
            .buckets
            .recent
            .iter()
            .chain(&ranking.buckets.frequent)
            .chain(&ranking.buckets.contextual)
            .map(|s| s.normalized.as_str())
            .collect();

        assert!(!everything.contains(&"soccer"));
        assert!(everything.contains(&"tennis"));
    }

    #[test]
    fn test_recent_and_frequent_with_empty_contextual() {
        // Pizza twice inside the week, Sushi once long ago in a different
        // time-of-day bucket: only Pizza surfaces, nothing is contextual.
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 21, 10);
        let rows = vec![
            row(tenant, "Pizza", at(2025, 6, 20, 10)),
            row(tenant, "pizza", at(2025, 6, 19, 10)),
            row(tenant, "Sushi", at(2025, 6, 1, 20)),
        ];

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert_eq!(ranking.buckets.recent.len(), 1);
        assert_eq!(ranking.buckets.recent[0].display, "Pizza");
        assert_eq!(ranking.buckets.recent[0].frequency, 2);

        assert_eq!(ranking.buckets.frequent.len(), 1);
        assert_eq!(ranking.buckets.frequent[0].normalized, "pizza");

        assert!(ranking.buckets.contextual.is_empty());
    }

    #[test]
    fn test_contextual_excludes_already_selected() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        // Both rows are recent and share the morning bucket with the
        // request; they land in Recent and must not reappear.
        let rows = vec![
            row(tenant, "Laundry", at(2025, 6, 9, 9)),
            row(tenant, "Dishes", at(2025, 6, 8, 9)),
        ];

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert_eq!(ranking.buckets.recent.len(), 2);
        assert!(ranking.buckets.contextual.is_empty());
    }

    #[test]
    fn test_contextual_by_actor() {
        let tenant = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        // Old single-use row in a different time-of-day bucket; only the
        // actor match can surface it.
        let rows = vec![row_with_actor(
            tenant,
            "Gardening",
            at(2025, 5, 1, 20),
            Some(actor),
        )];

        let with_actor = rank_suggestions(
            &rows,
            "category",
            None,
            Some(actor),
            now,
            &BucketLimits::default(),
        );
        assert_eq!(with_actor.buckets.contextual.len(), 1);
        assert_eq!(with_actor.buckets.contextual[0].display, "Gardening");

        let without_actor =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());
        assert!(without_actor.buckets.contextual.is_empty());
    }

    #[test]
    fn test_contextual_by_time_of_day() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 9);
        // Too old for Recent, too rare for Frequent, but same morning
        // bucket as the request.
        let rows = vec![row(tenant, "Breakfast run", at(2025, 5, 20, 8))];

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert!(ranking.buckets.recent.is_empty());
        assert!(ranking.buckets.frequent.is_empty());
        assert_eq!(ranking.buckets.contextual.len(), 1);
    }

    #[test]
    fn test_bucket_caps_and_ordering() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);

        let mut rows = Vec::new();
        for day in 1..=7u32 {
            rows.push(row(tenant, &format!("Chore {}", day), at(2025, 6, 3 + day, 10)));
        }

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert_eq!(ranking.buckets.recent.len(), 5);
        // Newest first.
        assert_eq!(ranking.buckets.recent[0].display, "Chore 7");
        assert_eq!(ranking.buckets.recent[4].display, "Chore 3");
    }

    #[test]
    fn test_frequent_orders_by_frequency_then_recency() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        let rows = vec![
            row(tenant, "Rare", at(2025, 6, 9, 10)),
            row(tenant, "Common", at(2025, 6, 8, 10)),
            row(tenant, "Common", at(2025, 6, 7, 10)),
            row(tenant, "Common", at(2025, 6, 6, 10)),
            row(tenant, "AlsoCommon", at(2025, 6, 9, 11)),
            row(tenant, "AlsoCommon", at(2025, 6, 5, 10)),
            row(tenant, "AlsoCommon", at(2025, 6, 4, 10)),
        ];

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        let frequent: Vec<(&str, u32)> = ranking
            .buckets
            .frequent
            .iter()
            .map(|s| (s.normalized.as_str(), s.frequency))
            .collect();

        // Equal frequency breaks on recency: AlsoCommon was used later.
        assert_eq!(frequent, vec![("alsocommon", 3), ("common", 3)]);
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let tenant = Uuid::new_v4();
        let now = at(2025, 6, 10, 10);
        let mut rows = vec![
            row(tenant, "Valid", at(2025, 6, 9, 10)),
            row(tenant, "Other", at(2025, 6, 7, 10)),
        ];
        rows.push(HistoryRecord {
            content: "{broken".to_string(),
            ..row(tenant, "x", at(2025, 6, 8, 10))
        });
        rows.push(HistoryRecord {
            content: r#"{"title":"no category field"}"#.to_string(),
            ..row(tenant, "x", at(2025, 6, 6, 10))
        });

        let ranking =
            rank_suggestions(&rows, "category", None, None, now, &BucketLimits::default());

        assert_eq!(ranking.considered, 4);
        assert_eq!(ranking.skipped, 2);
        assert_eq!(ranking.buckets.recent.len(), 2);
    }
}

#[cfg(test)]
mod cache_tests {
    use crate::infra::ttl_cache::TtlCache;
    use std::time::Duration;

    #[tokio::test]
    async fn test_roundtrip_and_miss() {
        let cache: TtlCache<String> = TtlCache::new();
        cache.put("k", "v".to_string(), Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await, Some("v".to_string()));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_deleted_on_read() {
        let cache: TtlCache<String> = TtlCache::new();
        cache.put("k", "v".to_string(), Duration::from_millis(40)).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len().await, 0, "lazy expiry must delete the entry");
    }

    #[tokio::test]
    async fn test_one_second_ttl_scenario() {
        let cache: TtlCache<String> = TtlCache::new();
        cache.put("k", "v".to_string(), Duration::from_secs(1)).await;

        assert_eq!(cache.get("k").await, Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_put_fully_replaces() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new();
        cache.put("k", vec![1, 2, 3], Duration::from_secs(60)).await;
        cache.put("k", vec![9], Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await, Some(vec![9]));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_prefix() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.put("t1:category", 1, Duration::from_secs(60)).await;
        cache.put("t1:location", 2, Duration::from_secs(60)).await;
        cache.put("t2:category", 3, Duration::from_secs(60)).await;

        let dropped = cache.invalidate_prefix("t1:").await;

        assert_eq!(dropped, 2);
        assert_eq!(cache.get("t1:category").await, None);
        assert_eq!(cache.get("t2:category").await, Some(3));
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.put("dead", 1, Duration::from_millis(10)).await;
        cache.put("live", 2, Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.sweep_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("live").await, Some(2));
    }
}

#[cfg(test)]
mod artifact_tests {
    use crate::error::SuggestError;
    use crate::infra::artifact_cache::ArtifactCache;
    use platform::store::{DurableStore, MemoryStore, StoreError};
    use std::sync::Arc;

    #[derive(Clone)]
    struct FailingStore;

    impl DurableStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_artifact_roundtrip() {
        let cache = ArtifactCache::new(Arc::new(MemoryStore::new()));
        let artifact = serde_json::json!({"summary": "busy week", "records": 12});

        cache.put("insight:t1", &artifact, 60).await.unwrap();
        let cached: Option<serde_json::Value> = cache.get("insight:t1").await.unwrap();

        assert_eq!(cached, Some(artifact));
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.put("insight:t1", "{broken", 60).await.unwrap();

        let cache = ArtifactCache::new(store);
        let cached: Option<serde_json::Value> = cache.get("insight:t1").await.unwrap();

        assert_eq!(cached, None, "corrupt payload must parse as a miss");
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let cache = ArtifactCache::new(Arc::new(FailingStore));
        let result = cache.get::<serde_json::Value>("insight:t1").await;

        assert!(matches!(result, Err(SuggestError::Store(_))));
    }
}

#[cfg(test)]
mod suggestion_use_case_tests {
    use crate::application::config::SuggestConfig;
    use crate::application::suggestions::{SuggestionParams, SuggestionsUseCase};
    use crate::domain::entities::HistoryRecord;
    use crate::domain::repository::HistoryRepository;
    use crate::error::{SuggestError, SuggestResult};
    use crate::infra::ttl_cache::TtlCache;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    #[derive(Clone, Default)]
    struct InMemoryHistory {
        rows: Arc<RwLock<Vec<HistoryRecord>>>,
    }

    impl HistoryRepository for InMemoryHistory {
        async fn recent(&self, tenant_id: Uuid, limit: u32) -> SuggestResult<Vec<HistoryRecord>> {
            let rows = self.rows.read().await;
            let mut out: Vec<HistoryRecord> = rows
                .iter()
                .filter(|r| r.tenant_id == tenant_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            out.truncate(limit as usize);
            Ok(out)
        }

        async fn append(&self, record: &HistoryRecord) -> SuggestResult<()> {
            self.rows.write().await.push(record.clone());
            Ok(())
        }
    }

    #[derive(Clone)]
    struct FailingHistory;

    impl HistoryRepository for FailingHistory {
        async fn recent(&self, _tenant: Uuid, _limit: u32) -> SuggestResult<Vec<HistoryRecord>> {
            Err(SuggestError::Internal("history down".to_string()))
        }

        async fn append(&self, _record: &HistoryRecord) -> SuggestResult<()> {
            Err(SuggestError::Internal("history down".to_string()))
        }
    }

    fn use_case(history: InMemoryHistory) -> SuggestionsUseCase<InMemoryHistory> {
        SuggestionsUseCase::new(
            Arc::new(history),
            Arc::new(TtlCache::new()),
            Arc::new(SuggestConfig::default()),
        )
    }

    fn params(tenant: Uuid) -> SuggestionParams {
        SuggestionParams {
            tenant_id: tenant,
            field: "category".to_string(),
            current_value: None,
            actor_id: None,
        }
    }

    async fn seed(history: &InMemoryHistory, tenant: Uuid, value: &str) {
        history
            .append(&HistoryRecord::new(
                tenant,
                None,
                None,
                format!(r#"{{"category":"{}"}}"#, value),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let history = InMemoryHistory::default();
        let tenant = Uuid::new_v4();
        seed(&history, tenant, "Groceries").await;

        let use_case = use_case(history);

        let first = use_case.execute(params(tenant)).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.considered, 1);
        assert_eq!(first.buckets.recent[0].display, "Groceries");

        let second = use_case.execute(params(tenant)).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.considered, 0, "a hit skips the history read");
        assert_eq!(second.buckets, first.buckets);
    }

    #[tokio::test]
    async fn test_write_invalidates_tenant() {
        let history = InMemoryHistory::default();
        let tenant = Uuid::new_v4();
        seed(&history, tenant, "Groceries").await;

        let use_case = use_case(history.clone());
        use_case.execute(params(tenant)).await.unwrap();

        seed(&history, tenant, "Hardware").await;
        let dropped = use_case.invalidate_tenant(tenant).await;
        assert_eq!(dropped, 1);

        let fresh = use_case.execute(params(tenant)).await.unwrap();
        assert!(!fresh.from_cache);
        let values: Vec<&str> = fresh
            .buckets
            .recent
            .iter()
            .map(|s| s.display.as_str())
            .collect();
        assert!(values.contains(&"Hardware"));
    }

    #[tokio::test]
    async fn test_invalidation_is_per_tenant() {
        let history = InMemoryHistory::default();
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();
        seed(&history, tenant_a, "Groceries").await;
        seed(&history, tenant_b, "Laundry").await;

        let use_case = use_case(history);
        use_case.execute(params(tenant_a)).await.unwrap();
        use_case.execute(params(tenant_b)).await.unwrap();

        use_case.invalidate_tenant(tenant_a).await;

        let b_again = use_case.execute(params(tenant_b)).await.unwrap();
        assert!(b_again.from_cache, "other tenants keep their cache");
    }

    #[tokio::test]
    async fn test_empty_history_is_ok_not_error() {
        let use_case = use_case(InMemoryHistory::default());
        let output = use_case.execute(params(Uuid::new_v4())).await.unwrap();

        assert!(!output.from_cache);
        assert!(output.buckets.is_empty());
    }

    #[tokio::test]
    async fn test_failing_history_is_an_error() {
        let use_case = SuggestionsUseCase::new(
            Arc::new(FailingHistory),
            Arc::new(TtlCache::new()),
            Arc::new(SuggestConfig::default()),
        );

        let result = use_case.execute(params(Uuid::new_v4())).await;
        assert!(result.is_err(), "a failing source must not look like no data");
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected() {
        let use_case = use_case(InMemoryHistory::default());
        let result = use_case
            .execute(SuggestionParams {
                tenant_id: Uuid::new_v4(),
                field: "   ".to_string(),
                current_value: None,
                actor_id: None,
            })
            .await;

        assert!(matches!(result, Err(SuggestError::InvalidRequest(_))));
    }
}

#[cfg(test)]
mod insight_use_case_tests {
    use crate::application::config::SuggestConfig;
    use crate::application::insights::{InsightSource, InsightsUseCase};
    use crate::error::{SuggestError, SuggestResult};
    use platform::store::{DurableStore, MemoryStore, StoreError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use uuid::Uuid;

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicU32>,
    }

    impl InsightSource for CountingSource {
        async fn compute(&self, tenant_id: Uuid) -> SuggestResult<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({"tenant": tenant_id.to_string(), "summary": "ok"}))
        }
    }

    #[derive(Clone)]
    struct ReadOkWriteFailStore;

    impl DurableStore for ReadOkWriteFailStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[derive(Clone)]
    struct FailingStore;

    impl DurableStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_compute_once_then_cached() {
        let source = CountingSource::default();
        let use_case = InsightsUseCase::new(
            Arc::new(MemoryStore::new()),
            Arc::new(source.clone()),
            Arc::new(SuggestConfig::default()),
        );
        let tenant = Uuid::new_v4();

        let first = use_case.execute(tenant).await.unwrap();
        assert!(!first.from_cache);

        let second = use_case.execute(tenant).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.artifact, first.artifact);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_artifact_regenerates() {
        let store = Arc::new(MemoryStore::new());
        let tenant = Uuid::new_v4();
        store
            .put(&format!("insight:{}", tenant), "{broken", 60)
            .await
            .unwrap();

        let source = CountingSource::default();
        let use_case = InsightsUseCase::new(
            store,
            Arc::new(source.clone()),
            Arc::new(SuggestConfig::default()),
        );

        let output = use_case.execute(tenant).await.unwrap();
        assert!(!output.from_cache);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_read_failure_propagates() {
        let use_case = InsightsUseCase::new(
            Arc::new(FailingStore),
            Arc::new(CountingSource::default()),
            Arc::new(SuggestConfig::default()),
        );

        let result = use_case.execute(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SuggestError::Store(_))));
    }

    #[tokio::test]
    async fn test_store_write_failure_still_serves_artifact() {
        let source = CountingSource::default();
        let use_case = InsightsUseCase::new(
            Arc::new(ReadOkWriteFailStore),
            Arc::new(source.clone()),
            Arc::new(SuggestConfig::default()),
        );

        let output = use_case.execute(Uuid::new_v4()).await.unwrap();
        assert!(!output.from_cache);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
