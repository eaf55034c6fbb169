//! Admission (Request Rate Limiting) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Window entry, value objects, store trait
//! - `application/` - Configuration and the check-and-admit use case
//! - `infra/` - In-memory store and the expiry sweeper
//! - `presentation/` - axum middleware, quota headers, 429 body
//!
//! ## Model
//! - Fixed windows per client key (peer address, or `"unknown"`)
//! - A window opens on the first request and lasts `window`; the counter
//!   restarts once it has passed
//! - Request `max_requests + 1` and later in the same window get 429
//! - Expire-check-increment is atomic per key

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AdmissionConfig;
pub use domain::value_objects::{ClientKey, QuotaSnapshot, RateLimitDecision, WindowPolicy};
pub use error::{AdmissionError, AdmissionResult};
pub use infra::memory::InMemoryRateLimitStore;
pub use infra::sweeper::{SweeperHandle, spawn_sweeper};
pub use presentation::middleware::{AdmissionState, rate_limit};
