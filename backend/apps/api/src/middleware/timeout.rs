//! Request timeout
//!
//! Handlers that run past the limit are dropped and answered with 504.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use std::time::Duration;

/// Middleware state: upper bound for one handler invocation
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

pub async fn enforce_timeout(
    State(RequestTimeout(limit)): State<RequestTimeout>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, timeout_ms = limit.as_millis() as u64, "Request timed out");
            AppError::gateway_timeout(format!(
                "Request exceeded {}ms timeout",
                limit.as_millis()
            ))
            .with_instance(path)
            .into_response()
        }
    }
}
