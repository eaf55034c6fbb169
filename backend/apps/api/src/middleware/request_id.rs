//! Request ID generation
//!
//! An incoming `X-Request-ID` is kept as is; otherwise a UUID v4 is
//! generated. `PropagateRequestIdLayer` copies it onto the response.

use axum::http::{HeaderValue, Request};
use kernel::id::RequestId;
use tower_http::request_id::{self, MakeRequestId};

#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestIdV4;

impl MakeRequestId for MakeRequestIdV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<request_id::RequestId> {
        HeaderValue::from_str(&RequestId::new().to_string())
            .ok()
            .map(request_id::RequestId::new)
    }
}
