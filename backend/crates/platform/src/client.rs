//! Client identification utilities
//!
//! Common functions for resolving the caller identity behind a request.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Header carrying the authenticated principal id, set by the auth layer
/// in front of this service. Never set by clients directly.
pub const PRINCIPAL_HEADER: &str = "x-auth-user";

/// Header carrying the client IP as resolved by our own edge. Trusted.
pub const TRUSTED_IP_HEADER: &str = "x-real-client-ip";

/// Standard proxy header. Less trusted; only the first value is used.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Caller identity resolved from request headers
///
/// Used to key rate-limit windows and to classify probe traffic.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// Authenticated principal id, if the auth layer identified one
    pub principal: Option<String>,
    /// Best-effort client network address
    pub ip: Option<IpAddr>,
}

impl CallerIdentity {
    /// Create a new identity
    pub fn new(principal: Option<String>, ip: Option<IpAddr>) -> Self {
        Self { principal, ip }
    }

    /// Stable identifier string for store keys and logs
    ///
    /// Priority: authenticated principal > client IP > `"unknown"`.
    pub fn key(&self) -> String {
        if let Some(principal) = &self.principal {
            return format!("user:{}", principal);
        }
        if let Some(ip) = self.ip {
            return format!("ip:{}", ip);
        }
        "unknown".to_string()
    }

    /// Masked identifier, safe for structured logs
    pub fn masked_key(&self) -> String {
        mask_identifier(&self.key())
    }
}

/// Resolve the caller identity from request headers
///
/// The principal comes from [`PRINCIPAL_HEADER`]; the network address is
/// resolved with [`extract_client_ip`].
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
pub fn extract_caller(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> CallerIdentity {
    let principal = headers
        .get(PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    CallerIdentity::new(principal, extract_client_ip(headers, direct_ip))
}

/// Extract the client IP address from headers
///
/// Checks the trusted [`TRUSTED_IP_HEADER`] first, then the first value of
/// [`FORWARDED_FOR_HEADER`], then falls back to the direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(real) = headers.get(TRUSTED_IP_HEADER).and_then(|v| v.to_str().ok()) {
        if let Ok(ip) = real.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }

    // X-Forwarded-For may hold a comma-separated chain; only the first
    // (client-most) value is considered.
    if let Some(xff) = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    direct_ip
}

/// Mask an identifier for logging: first 10 characters plus a marker
///
/// Log events must never carry the full caller identifier.
pub fn mask_identifier(identifier: &str) -> String {
    const VISIBLE: usize = 10;
    if identifier.chars().count() <= VISIBLE {
        return identifier.to_string();
    }
    let prefix: String = identifier.chars().take(VISIBLE).collect();
    format!("{}***", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_principal_takes_priority() {
        let mut headers = HeaderMap::new();
        headers.insert(PRINCIPAL_HEADER, HeaderValue::from_static("alice"));
        headers.insert(TRUSTED_IP_HEADER, HeaderValue::from_static("192.168.1.1"));

        let caller = extract_caller(&headers, None);
        assert_eq!(caller.key(), "user:alice");
    }

    #[test]
    fn test_trusted_header_over_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(TRUSTED_IP_HEADER, HeaderValue::from_static("192.168.1.1"));
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("10.0.0.1, 10.0.0.2"),
        );

        let caller = extract_caller(&headers, None);
        assert_eq!(caller.key(), "ip:192.168.1.1");
    }

    #[test]
    fn test_forwarded_first_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_direct_ip_fallback() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_unknown_when_nothing_resolves() {
        let headers = HeaderMap::new();
        let caller = extract_caller(&headers, None);
        assert_eq!(caller.key(), "unknown");
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("short"), "short");
        assert_eq!(mask_identifier("ip:1.2.3.4"), "ip:1.2.3.4");
        assert_eq!(mask_identifier("user:0123456789abcdef"), "user:01234***");
    }
}
