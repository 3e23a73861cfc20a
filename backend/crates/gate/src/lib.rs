//! Gate - Edge Traffic Governance
//!
//! Clean Architecture structure:
//! - `domain/` - Window records, decisions, pure matching logic
//! - `application/` - Admission policy and probe filter use cases
//! - `infra/` - Store-backed window counter
//! - `presentation/` - Guard middleware and wire DTOs
//!
//! ## Governance Model
//! - Every inbound request passes the probe filter, then the admission
//!   policy, before any handler runs
//! - Counters live in the durable key-value store; concurrent invocations
//!   may see stale counts and that is accepted (abuse mitigation, not
//!   accounting)
//! - Store failures never fail a request: they resolve to the configured
//!   fail-open/fail-closed decision
//! - Rejections are classifications, not errors; nothing in this crate
//!   raises an error to its callers

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::admission::AdmissionPolicy;
pub use application::config::{AdmissionRule, GateConfig, ProbeConfig};
pub use application::probe::ProbeFilter;
pub use domain::value_objects::{AdmissionDecision, EndpointClass, RejectionKind, Verdict};
pub use infra::window::WindowCounter;
pub use presentation::middleware::{GateState, guard};
