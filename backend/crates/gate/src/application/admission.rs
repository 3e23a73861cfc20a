//! Admission Policy Use Case

use std::sync::Arc;
use std::time::Duration;

use platform::client::CallerIdentity;
use platform::store::DurableStore;

use crate::application::config::AdmissionRule;
use crate::domain::value_objects::AdmissionDecision;
use crate::infra::window::WindowCounter;

/// Admission Policy Use Case
///
/// Wraps the window counter with one named configuration. Every check
/// resolves to a decision carrying limit metadata; errors never escape.
pub struct AdmissionPolicy<S>
where
    S: DurableStore,
{
    counter: WindowCounter<S>,
    rule: AdmissionRule,
}

impl<S> AdmissionPolicy<S>
where
    S: DurableStore,
{
    pub fn new(
        store: Arc<S>,
        rule: AdmissionRule,
        persist_interval: Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            counter: WindowCounter::new(store, persist_interval, store_timeout),
            rule,
        }
    }

    /// Check the caller against this rule's window
    pub async fn check(&self, caller: &CallerIdentity) -> AdmissionDecision {
        let key = format!("{}:{}", self.rule.key_prefix, caller.key());

        let decision = self
            .counter
            .increment_and_check(
                &key,
                self.rule.window_ms(),
                self.rule.max_count,
                self.rule.skip_on_error,
            )
            .await;

        if !decision.allowed {
            tracing::info!(
                rule = %self.rule.key_prefix,
                client = %caller.masked_key(),
                limit = decision.limit,
                "Admission denied"
            );
        }

        decision
    }

    pub fn rule(&self) -> &AdmissionRule {
        &self.rule
    }
}
