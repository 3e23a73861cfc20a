//! Probe Filter Use Case

use std::sync::Arc;

use platform::client::CallerIdentity;
use platform::store::DurableStore;

use crate::application::admission::AdmissionPolicy;
use crate::application::config::{GateConfig, ProbeConfig};
use crate::domain::services::{contains_any, extension_of, path_is_blocked, query_pairs_lowercased};
use crate::domain::value_objects::{EndpointClass, RejectionKind, Verdict};

/// Probe Filter Use Case
///
/// Stateless pattern matcher over path, extension, user-agent and query
/// parameters, with volumetric throttling for everything that matches no
/// pattern. Checks run in a fixed order and the first match wins.
pub struct ProbeFilter<S>
where
    S: DurableStore,
{
    config: ProbeConfig,
    api_admission: AdmissionPolicy<S>,
    mutation_admission: AdmissionPolicy<S>,
}

impl<S> ProbeFilter<S>
where
    S: DurableStore,
{
    pub fn new(store: Arc<S>, config: GateConfig) -> Self {
        let GateConfig {
            probe,
            api_rule,
            mutation_rule,
            persist_interval,
            store_timeout,
        } = config;

        Self {
            config: probe,
            api_admission: AdmissionPolicy::new(
                store.clone(),
                api_rule,
                persist_interval,
                store_timeout,
            ),
            mutation_admission: AdmissionPolicy::new(
                store,
                mutation_rule,
                persist_interval,
                store_timeout,
            ),
        }
    }

    /// Evaluate one request
    ///
    /// Check order: allow-list bypass, blocked path, blocked extension,
    /// blocked user-agent, admission, suspicious parameter. Rejections
    /// are classifications consumed by the caller; nothing is thrown.
    pub async fn evaluate(
        &self,
        path: &str,
        user_agent: Option<&str>,
        query: Option<&str>,
        caller: &CallerIdentity,
        class: EndpointClass,
    ) -> Verdict {
        let caller_key = caller.key();

        if self
            .config
            .allow_list
            .iter()
            .any(|entry| caller_key == *entry || caller_key.starts_with(entry.as_str()))
        {
            tracing::debug!(client = %caller.masked_key(), "Probe filter bypassed");
            return Verdict::Pass { admission: None };
        }

        let path_lc = path.to_lowercase();

        if let Some(blocked) = self
            .config
            .blocked_paths
            .iter()
            .find(|blocked| path_is_blocked(&path_lc, blocked))
        {
            return self.reject(RejectionKind::Path, caller, path, Some(blocked));
        }

        if let Some(ext) = extension_of(&path_lc) {
            if self.config.blocked_extensions.iter().any(|b| b == ext) {
                return self.reject(RejectionKind::Extension, caller, path, Some(ext));
            }
        }

        if let Some(ua) = user_agent {
            let ua_lc = ua.to_lowercase();
            if let Some(matched) = contains_any(&ua_lc, &self.config.blocked_user_agents) {
                return self.reject(RejectionKind::UserAgent, caller, path, Some(matched));
            }
        }

        let admission = match class {
            EndpointClass::Api => self.api_admission.check(caller).await,
            EndpointClass::Mutation => self.mutation_admission.check(caller).await,
        };

        if !admission.allowed {
            return Verdict::Reject {
                kind: RejectionKind::Throttled,
                admission: Some(admission),
            };
        }

        if let Some(query) = query {
            for pair in query_pairs_lowercased(query) {
                if let Some(matched) = contains_any(&pair, &self.config.suspicious_params) {
                    return self.reject(RejectionKind::Parameter, caller, path, Some(matched));
                }
            }
        }

        Verdict::Pass {
            admission: Some(admission),
        }
    }

    fn reject(
        &self,
        kind: RejectionKind,
        caller: &CallerIdentity,
        path: &str,
        matched: Option<&str>,
    ) -> Verdict {
        tracing::warn!(
            reason = %kind,
            path,
            matched = matched.unwrap_or(""),
            client = %caller.masked_key(),
            "Request rejected at edge"
        );
        Verdict::Reject {
            kind,
            admission: None,
        }
    }
}
