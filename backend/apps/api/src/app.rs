//! Router assembly
//!
//! Layer order, outermost first: security headers, request ID, tracing,
//! request ID propagation, compression, CORS, response timing, rate limiting,
//! timeout.

use admission::{AdmissionState, InMemoryRateLimitStore, rate_limit};
use axum::extract::State;
use axum::http::{HeaderValue, Method, Uri, header};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use kernel::error::app_error::AppError;
use platform::clock::Clock;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::health::{HealthState, health_router};
use crate::middleware::request_id::MakeRequestIdV4;
use crate::middleware::security::with_security_headers;
use crate::middleware::timeout::{RequestTimeout, enforce_timeout};
use crate::middleware::timing::{SlowRequestThreshold, record_response_time};

/// Everything the router needs that outlives a single request
pub struct AppDependencies {
    pub config: Arc<ApiConfig>,
    pub store: Arc<InMemoryRateLimitStore>,
    pub clock: Arc<dyn Clock>,
    pub database: Option<PgPool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub rate_limit: RateLimitPolicy,
}

pub fn build_router(deps: AppDependencies) -> Router {
    let config = deps.config;

    let admission_state = AdmissionState::new(
        deps.store,
        Arc::new(config.admission.clone()),
        deps.clock,
    );

    let service_info = ServiceInfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rate_limit: RateLimitPolicy {
            max_requests: config.admission.max_requests,
            window_ms: config.admission.window_ms(),
        },
    };

    let api_v1 = Router::new()
        .route("/api/v1", get(service_info_handler))
        .with_state(Arc::new(service_info));

    let router = Router::new()
        .merge(health_router(HealthState::new(
            &config.environment,
            deps.database,
        )))
        .merge(api_v1)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestIdV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CompressionLayer::new())
                .layer(build_cors(&config.frontend_origins))
                .layer(from_fn_with_state(
                    SlowRequestThreshold(config.slow_request_threshold),
                    record_response_time,
                ))
                .layer(from_fn_with_state(
                    admission_state,
                    rate_limit::<InMemoryRateLimitStore>,
                ))
                .layer(from_fn_with_state(
                    RequestTimeout(config.request_timeout),
                    enforce_timeout,
                )),
        );

    with_security_headers(router, config.is_production())
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

/// GET /api/v1
async fn service_info_handler(
    State(info): State<Arc<ServiceInfoResponse>>,
) -> Json<ServiceInfoResponse> {
    Json(info.as_ref().clone())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path())).with_instance(uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use platform::clock::ManualClock;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    const T0: i64 = 1_700_000_000_000;

    fn test_config(max_requests: u32) -> ApiConfig {
        let max = max_requests.to_string();
        ApiConfig::from_lookup(|key| match key {
            "RATE_LIMIT_MAX_REQUESTS" => Some(max.clone()),
            "APP_ENV" => Some("test".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn app_with(max_requests: u32, clock: Arc<ManualClock>) -> Router {
        build_router(AppDependencies {
            config: Arc::new(test_config(max_requests)),
            store: Arc::new(InMemoryRateLimitStore::new()),
            clock,
            database: None,
        })
    }

    fn get_from(uri: &str, peer: &str) -> Request<Body> {
        let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_service_info_is_admitted_with_headers() {
        let app = app_with(10, Arc::new(ManualClock::new(T0)));

        let response = app
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "10");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "9");
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("x-response-time"));

        let json = json_body(response).await;
        assert_eq!(json["name"], "api");
        assert_eq!(json["rateLimit"]["maxRequests"], 10);
        assert_eq!(json["rateLimit"]["windowMs"], 60_000);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_and_reset() {
        let clock = Arc::new(ManualClock::new(T0));
        let app = app_with(10, clock.clone());

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        clock.advance(6_000);
        let response = app
            .clone()
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("x-request-id"));
        let json = json_body(response).await;
        assert_eq!(json["error"], "Too many requests");
        assert_eq!(json["retryAfter"], 54);

        // Health checks stay reachable for the exhausted client
        let response = app
            .clone()
            .oneshot(get_from("/health", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_none());

        // New window
        clock.advance(55_000);
        let response = app
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "9");
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let app = app_with(10, Arc::new(ManualClock::new(T0)));

        let mut req = get_from("/health", "192.0.2.10:5000");
        req.headers_mut()
            .insert("x-request-id", HeaderValue::from_static("trace-abc-123"));
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
    }

    #[tokio::test]
    async fn test_unknown_route_is_problem_json_and_counted() {
        let app = app_with(1, Arc::new(ManualClock::new(T0)));

        let response = app
            .clone()
            .oneshot(get_from("/api/v1/nope", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
        let json = json_body(response).await;
        assert_eq!(json["status"], 404);
        assert_eq!(json["instance"], "/api/v1/nope");

        let response = app
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_rejections_carry_security_headers() {
        let app = app_with(1, Arc::new(ManualClock::new(T0)));

        let _ = app
            .clone()
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();
        let response = app
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
        // APP_ENV=test
        assert!(
            response
                .headers()
                .get(header::CONTENT_SECURITY_POLICY)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_json_is_compressed_when_accepted() {
        let app = app_with(10, Arc::new(ManualClock::new(T0)));

        let mut req = get_from("/api/v1", "192.0.2.10:5000");
        req.headers_mut()
            .insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        let response = app.clone().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "9");

        let response = app
            .oneshot(get_from("/api/v1", "192.0.2.10:5000"))
            .await
            .unwrap();
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn test_cors_allows_frontend_origin() {
        let app = app_with(10, Arc::new(ManualClock::new(T0)));

        let mut req = get_from("/api/v1", "192.0.2.10:5000");
        req.headers_mut().insert(
            header::ORIGIN,
            HeaderValue::from_static("http://localhost:4200"),
        );
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:4200"
        );
    }
}
