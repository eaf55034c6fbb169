//! Application Configuration
//!
//! Configuration for request admission.

use std::time::Duration;

use crate::domain::value_objects::WindowPolicy;
use crate::error::{AdmissionError, AdmissionResult};
use platform::client::ClientIpSource;

/// Longest accepted window and sweep interval (7 days)
pub const MAX_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Admission configuration
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum requests allowed per client in one window
    pub max_requests: u32,
    /// Fixed window duration
    pub window: Duration,
    /// How often expired entries are swept from the store
    pub sweep_interval: Duration,
    /// Where the client address is read from
    pub client_ip_source: ClientIpSource,
    /// Path prefixes that bypass admission (health checks)
    pub exempt_prefixes: Vec<String>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
            client_ip_source: ClientIpSource::PeerAddress,
            exempt_prefixes: vec!["/health".to_string()],
        }
    }
}

impl AdmissionConfig {
    /// Quota of `max_requests` per `window_ms`; the sweep runs once per window
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        let window = Duration::from_millis(window_ms);
        Self {
            max_requests,
            window,
            sweep_interval: window,
            ..Self::default()
        }
    }

    /// Window length in ms, saturating at `i64::MAX` for unvalidated configs
    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn policy(&self) -> WindowPolicy {
        WindowPolicy::new(self.max_requests, self.window_ms())
    }

    pub fn validate(&self) -> AdmissionResult<()> {
        if self.max_requests == 0 {
            return Err(AdmissionError::InvalidConfig(
                "max_requests must be at least 1".to_string(),
            ));
        }
        if self.window.as_millis() == 0 {
            return Err(AdmissionError::InvalidConfig(
                "window must be at least 1ms".to_string(),
            ));
        }
        if self.window > MAX_WINDOW {
            return Err(AdmissionError::InvalidConfig(format!(
                "window must be at most {}ms",
                MAX_WINDOW.as_millis()
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(AdmissionError::InvalidConfig(
                "sweep_interval must be non-zero".to_string(),
            ));
        }
        if self.sweep_interval > MAX_WINDOW {
            return Err(AdmissionError::InvalidConfig(format!(
                "sweep_interval must be at most {}ms",
                MAX_WINDOW.as_millis()
            )));
        }
        Ok(())
    }

    /// `/health` exempts `/health` and `/health/...` but not `/healthz`
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Human wording of the window, used in rejection messages
    pub fn window_description(&self) -> String {
        match self.window_ms() {
            1_000 => "second".to_string(),
            60_000 => "minute".to_string(),
            3_600_000 => "hour".to_string(),
            ms if ms % 1_000 == 0 => format!("{} seconds", ms / 1_000),
            ms => format!("{}ms", ms),
        }
    }
}
