//! API Configuration
//!
//! Read from the process environment after `.env` has been loaded.

use admission::AdmissionConfig;
use anyhow::{Context, Result, bail};
use platform::client::ClientIpSource;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:4200";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// `development`, `production`, ...; reported by the liveness check
    pub environment: String,
    /// Origins allowed by CORS
    pub frontend_origins: Vec<String>,
    /// Enables the readiness database probe when set
    pub database_url: Option<String>,
    pub request_timeout: Duration,
    /// Requests slower than this are logged at warn level
    pub slow_request_threshold: Duration,
    pub admission: AdmissionConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and empty keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = parse_or(&get, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&get, "PORT", 3001u16)?;

        let max_requests = parse_or(&get, "RATE_LIMIT_MAX_REQUESTS", 10u32)?;
        let window_ms = parse_or(&get, "RATE_LIMIT_WINDOW_MS", 60_000u64)?;
        let sweep_interval_ms = parse_or(&get, "RATE_LIMIT_SWEEP_INTERVAL_MS", window_ms)?;
        let trust_forwarded_for = parse_bool_or(&get, "RATE_LIMIT_TRUST_FORWARDED_FOR", false)?;

        let admission = AdmissionConfig {
            sweep_interval: Duration::from_millis(sweep_interval_ms),
            client_ip_source: ClientIpSource::from_trust_flag(trust_forwarded_for),
            ..AdmissionConfig::new(max_requests, window_ms)
        };
        admission
            .validate()
            .context("Invalid rate limit configuration")?;

        let request_timeout_ms = parse_or(&get, "REQUEST_TIMEOUT_MS", 30_000u64)?;
        if request_timeout_ms == 0 {
            bail!("REQUEST_TIMEOUT_MS must be greater than 0");
        }
        let slow_request_threshold_ms = parse_or(&get, "SLOW_REQUEST_THRESHOLD_MS", 1_000u64)?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            environment: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
            frontend_origins,
            database_url: get("DATABASE_URL"),
            request_timeout: Duration::from_millis(request_timeout_ms),
            slow_request_threshold: Duration::from_millis(slow_request_threshold_ms),
            admission,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} must be a boolean, got {raw:?}"),
        },
        None => Ok(default),
    }
}
