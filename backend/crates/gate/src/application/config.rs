//! Application Configuration
//!
//! Configuration for the edge governance layer.

use std::time::Duration;

/// One named admission configuration (an endpoint class)
#[derive(Debug, Clone)]
pub struct AdmissionRule {
    /// Store key prefix; also the rule's name in logs
    pub key_prefix: String,
    /// Window duration
    pub window: Duration,
    /// Maximum requests per window
    pub max_count: u32,
    /// On store failure: true allows the request (fail-open),
    /// false denies it (fail-closed)
    pub skip_on_error: bool,
}

impl AdmissionRule {
    pub fn new(key_prefix: &str, window_secs: u64, max_count: u32, skip_on_error: bool) -> Self {
        Self {
            key_prefix: key_prefix.to_string(),
            window: Duration::from_secs(window_secs),
            max_count,
            skip_on_error,
        }
    }

    /// General read traffic: generous limit, fail-open
    pub fn api() -> Self {
        Self::new("rl:api", 60, 100, true)
    }

    /// Write traffic: stricter limit, fail-closed
    pub fn mutation() -> Self {
        Self::new("rl:mut", 60, 30, false)
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Probe filter rule sets
///
/// Defaults ship the static pattern sets; deployments extend them via
/// [`ProbeConfig::with_overrides`]. All entries are stored lowercased.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Caller identifiers bypassing the filter (exact or prefix match)
    pub allow_list: Vec<String>,
    /// Blocked paths, matched with the exact boundary rule
    pub blocked_paths: Vec<String>,
    /// Blocked final dot-extensions (without the dot)
    pub blocked_extensions: Vec<String>,
    /// Blocked user-agent substrings
    pub blocked_user_agents: Vec<String>,
    /// Injection/traversal substrings matched against `key=value` pairs
    pub suspicious_params: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            blocked_paths: to_strings(&[
                "/wp-admin",
                "/wp-login.php",
                "/xmlrpc.php",
                "/phpmyadmin",
                "/cgi-bin",
                "/.env",
                "/.git",
                "/vendor/phpunit",
                "/actuator",
            ]),
            blocked_extensions: to_strings(&["php", "asp", "aspx", "jsp", "cgi"]),
            blocked_user_agents: to_strings(&[
                "sqlmap",
                "nikto",
                "nmap",
                "masscan",
                "dirbuster",
                "gobuster",
                "wpscan",
                "acunetix",
                "nessus",
            ]),
            suspicious_params: to_strings(&[
                "../",
                "..%2f",
                "<script",
                "union select",
                "information_schema",
                "/etc/passwd",
                "base64_decode",
                "sleep(",
            ]),
        }
    }
}

impl ProbeConfig {
    /// Merge per-deployment overrides into the static sets
    pub fn with_overrides(
        mut self,
        allow_list: Vec<String>,
        extra_paths: Vec<String>,
        extra_user_agents: Vec<String>,
    ) -> Self {
        self.allow_list
            .extend(allow_list.into_iter().map(|s| s.trim().to_string()));
        self.blocked_paths
            .extend(extra_paths.into_iter().map(|s| s.trim().to_lowercase()));
        self.blocked_user_agents
            .extend(extra_user_agents.into_iter().map(|s| s.trim().to_lowercase()));
        self
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Edge governance configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub probe: ProbeConfig,
    /// Admission rule for read traffic
    pub api_rule: AdmissionRule,
    /// Admission rule for write traffic
    pub mutation_rule: AdmissionRule,
    /// Minimum interval between persisted counter writes.
    /// Zero persists every increment.
    pub persist_interval: Duration,
    /// Bound on every durable-store call
    pub store_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            api_rule: AdmissionRule::api(),
            mutation_rule: AdmissionRule::mutation(),
            persist_interval: Duration::from_secs(30),
            store_timeout: Duration::from_millis(300),
        }
    }
}

impl GateConfig {
    /// Create config for development: exact counting, no write skipping
    pub fn development() -> Self {
        Self {
            persist_interval: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn persist_interval_ms(&self) -> i64 {
        self.persist_interval.as_millis() as i64
    }
}
