//! API DTOs (Data Transfer Objects)

use serde::Serialize;

/// Body of a 429 response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedResponse {
    pub error: String,
    pub message: String,
    /// Whole seconds until the window resets
    pub retry_after: u64,
}
