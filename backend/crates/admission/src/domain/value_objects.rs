//! Domain Value Objects

use std::fmt;
use std::net::IpAddr;

/// Identity a request is counted against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Bucket shared by every request without a resolvable address
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn from_ip(ip: Option<IpAddr>) -> Self {
        match ip {
            Some(ip) => Self(ip.to_string()),
            None => Self::unknown(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quota applied to each client: `max_requests` per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub max_requests: u32,
    pub window_ms: i64,
}

impl WindowPolicy {
    pub fn new(max_requests: u32, window_ms: i64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }
}

/// Values reported to the client in the `X-RateLimit-*` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub limit: u32,
    pub remaining: u32,
    /// Absolute end of the current window, epoch ms
    pub reset_at_ms: i64,
}

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Admitted(QuotaSnapshot),
    Rejected {
        quota: QuotaSnapshot,
        retry_after_secs: u64,
    },
}

impl RateLimitDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, RateLimitDecision::Admitted(_))
    }

    pub fn quota(&self) -> &QuotaSnapshot {
        match self {
            RateLimitDecision::Admitted(quota) => quota,
            RateLimitDecision::Rejected { quota, .. } => quota,
        }
    }
}

/// Whole seconds until `reset_at_ms`, rounded up, never below 1
pub fn retry_after_secs(reset_at_ms: i64, now_ms: i64) -> u64 {
    let wait_ms = (reset_at_ms - now_ms).max(0) as u64;
    wait_ms.div_ceil(1000).max(1)
}
