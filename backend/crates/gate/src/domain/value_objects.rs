//! Domain Value Objects
//!
//! Immutable value types for edge governance decisions.

/// Admission decision for one request
///
/// Computed fresh per call, never persisted. Carries limit metadata for
/// response headers regardless of the allow/deny outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub allowed: bool,
    /// Configured maximum for the window
    pub limit: u32,
    /// Requests left in the current window (0 when denied)
    pub remaining: u32,
    /// Epoch milliseconds at which the window resets
    pub reset_at_ms: i64,
    /// Seconds the caller should wait before retrying (denials only)
    pub retry_after_secs: Option<u32>,
}

impl AdmissionDecision {
    /// An allowing decision
    pub fn allow(limit: u32, remaining: u32, reset_at_ms: i64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at_ms,
            retry_after_secs: None,
        }
    }

    /// A denying decision
    pub fn deny(limit: u32, reset_at_ms: i64, retry_after_secs: u32) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at_ms,
            retry_after_secs: Some(retry_after_secs),
        }
    }

    /// Epoch seconds for the X-RateLimit-Reset header
    pub fn reset_at_secs(&self) -> i64 {
        self.reset_at_ms / 1000
    }
}

/// Why a request was rejected at the edge
///
/// The display form is the stable reason code used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RejectionKind {
    /// Path matched a blocked path with the exact boundary rule
    #[display("blocked_path")]
    Path,

    /// Final dot-extension is in the blocked set
    #[display("blocked_extension")]
    Extension,

    /// User-agent contains a blocked substring
    #[display("blocked_user_agent")]
    UserAgent,

    /// Admission policy denied the request
    #[display("throttled")]
    Throttled,

    /// A query parameter matched an injection/traversal pattern
    #[display("suspicious_parameter")]
    Parameter,
}

/// Endpoint class for named admission rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Read traffic
    Api,
    /// Write traffic (stricter limits)
    Mutation,
}

/// Outcome of the probe filter for one request
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Request may proceed. Admission metadata is present unless the
    /// caller was bypassed via the allow-list.
    Pass { admission: Option<AdmissionDecision> },

    /// Request must be rejected with the given classification.
    Reject {
        kind: RejectionKind,
        admission: Option<AdmissionDecision>,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    /// The rejection classification, if any
    pub fn rejection(&self) -> Option<RejectionKind> {
        match self {
            Verdict::Pass { .. } => None,
            Verdict::Reject { kind, .. } => Some(*kind),
        }
    }
}
