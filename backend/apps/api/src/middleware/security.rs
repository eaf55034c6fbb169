//! Security response headers
//!
//! Hardening headers added to every response unless the handler already set
//! them. The content security policy is only sent in production.

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

const HARDENING_HEADERS: [(&str, &str); 11] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';\
font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';\
img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';\
style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

/// Wrap every route (and the fallback) of `router` with the hardening headers
pub fn with_security_headers(router: Router, content_security_policy: bool) -> Router {
    let router = HARDENING_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        });

    if content_security_policy {
        router.layer(SetResponseHeaderLayer::if_not_present(
            axum::http::header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app(content_security_policy: bool) -> Router {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/embeddable",
                get(|| async { ([(header::X_FRAME_OPTIONS, "DENY")], "ok").into_response() }),
            )
            .fallback(|| async { StatusCode::NOT_FOUND });
        with_security_headers(router, content_security_policy)
    }

    #[tokio::test]
    async fn test_hardening_headers_are_added() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(false).oneshot(req).await.unwrap();

        for (name, value) in HARDENING_HEADERS {
            assert_eq!(response.headers()[name], value, "{name}");
        }
        assert!(
            response
                .headers()
                .get(header::CONTENT_SECURITY_POLICY)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_csp_only_when_enabled() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(true).oneshot(req).await.unwrap();

        assert_eq!(
            response.headers()[header::CONTENT_SECURITY_POLICY],
            CONTENT_SECURITY_POLICY
        );
    }

    #[tokio::test]
    async fn test_handler_values_win() {
        let req = Request::builder()
            .uri("/embeddable")
            .body(Body::empty())
            .unwrap();
        let response = app(false).oneshot(req).await.unwrap();

        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_fallback_gets_headers() {
        let req = Request::builder().uri("/missing").body(Body::empty()).unwrap();
        let response = app(false).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }
}
