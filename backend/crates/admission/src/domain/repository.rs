//! Store Traits
//!
//! Interface for the per-client counter store. Implementation is in the
//! infrastructure layer.

use crate::domain::value_objects::{ClientKey, RateLimitDecision, WindowPolicy};

/// Rate limit store
///
/// `check_and_admit` must be atomic per key: two concurrent calls for the
/// same key can never both observe the last free slot.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Expire, check and increment the counter for `key` at `now_ms`
    async fn check_and_admit(
        &self,
        key: &ClientKey,
        policy: &WindowPolicy,
        now_ms: i64,
    ) -> RateLimitDecision;

    /// Drop every entry whose window has ended. Returns how many were removed.
    async fn sweep_expired(&self, now_ms: i64) -> usize;

    /// Number of clients currently tracked
    async fn tracked_clients(&self) -> usize;
}
