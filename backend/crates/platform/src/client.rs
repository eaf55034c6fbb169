//! Client identification utilities
//!
//! Resolves the network address a request is attributed to.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Where the client address is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientIpSource {
    /// Only the TCP peer address
    #[default]
    PeerAddress,
    /// First entry of `X-Forwarded-For`, falling back to the peer address.
    /// Only correct behind a reverse proxy that overwrites the header.
    ForwardedFor,
}

impl ClientIpSource {
    pub fn from_trust_flag(trust_forwarded_for: bool) -> Self {
        if trust_forwarded_for {
            Self::ForwardedFor
        } else {
            Self::PeerAddress
        }
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Resolve the client address according to `source`
pub fn resolve_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    source: ClientIpSource,
) -> Option<IpAddr> {
    match source {
        ClientIpSource::PeerAddress => direct_ip,
        ClientIpSource::ForwardedFor => extract_client_ip(headers, direct_ip),
    }
}
