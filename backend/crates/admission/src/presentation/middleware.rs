//! Admission Middleware

use crate::application::check_and_admit::CheckAndAdmitUseCase;
use crate::application::config::AdmissionConfig;
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::ClientKey;
use crate::presentation::headers::apply_quota_headers;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::resolve_client_ip;
use platform::clock::Clock;
use std::net::SocketAddr;
use std::sync::Arc;

/// Middleware state
pub struct AdmissionState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AdmissionConfig>,
    pub clock: Arc<dyn Clock>,
}

impl<S> Clone for AdmissionState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S> AdmissionState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: Arc<AdmissionConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }
}

/// Key the request is counted against
pub fn client_key_for(req: &Request<Body>, config: &AdmissionConfig) -> ClientKey {
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    ClientKey::from_ip(resolve_client_ip(
        req.headers(),
        direct_ip,
        config.client_ip_source,
    ))
}

/// Middleware that admits or rejects each request against the client quota
///
/// Exempt paths pass straight through. Admitted responses carry the
/// `X-RateLimit-*` headers; rejected requests never reach the handler.
pub async fn rate_limit<S>(
    State(state): State<AdmissionState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    if state.config.is_exempt(req.uri().path()) {
        return next.run(req).await;
    }

    let key = client_key_for(&req, &state.config);
    if key.is_unknown() {
        tracing::debug!("No client address, using shared bucket");
    }

    let use_case = CheckAndAdmitUseCase::new(state.store.clone(), state.config.clone());

    match use_case.execute(&key, state.clock.now_ms()).await {
        Ok(quota) => {
            let mut response = next.run(req).await;
            apply_quota_headers(response.headers_mut(), &quota);
            response
        }
        Err(e) => e.into_response(),
    }
}
