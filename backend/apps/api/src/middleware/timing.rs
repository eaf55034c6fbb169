//! Response timing
//!
//! Adds `X-Response-Time` to every response and warns about slow requests.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::time::{Duration, Instant};

pub const X_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

/// Middleware state: requests slower than this are logged at warn level
#[derive(Debug, Clone, Copy)]
pub struct SlowRequestThreshold(pub Duration);

pub async fn record_response_time(
    State(SlowRequestThreshold(threshold)): State<SlowRequestThreshold>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(req).await;

    let elapsed = started.elapsed();
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

    if let Ok(value) = HeaderValue::from_str(&format!("{:.2}ms", elapsed_ms)) {
        response.headers_mut().insert(X_RESPONSE_TIME, value);
    }

    if elapsed > threshold {
        tracing::warn!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            request_id = request_id.as_deref().unwrap_or("-"),
            duration_ms = elapsed_ms,
            "Slow request detected"
        );
    }

    response
}
