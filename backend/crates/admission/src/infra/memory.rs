//! In-memory store backed by a sharded concurrent map

use crate::domain::entities::RateLimitEntry;
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::{
    ClientKey, RateLimitDecision, WindowPolicy, retry_after_secs,
};
use dashmap::DashMap;
use std::sync::Arc;

/// Process-local counters, lost on restart
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryRateLimitStore {
    entries: Arc<DashMap<ClientKey, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry for `key`, expired or not
    pub fn entry(&self, key: &ClientKey) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| *entry.value())
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_admit(
        &self,
        key: &ClientKey,
        policy: &WindowPolicy,
        now_ms: i64,
    ) -> RateLimitDecision {
        // The shard write lock is held for the whole expire-check-increment.
        let mut entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| RateLimitEntry::open(now_ms, policy.window_ms));

        if entry.is_expired(now_ms) {
            *entry = RateLimitEntry::open(now_ms, policy.window_ms);
        }

        let admitted = entry.try_admit(policy.max_requests);
        let quota = entry.snapshot(policy);
        drop(entry);

        if admitted {
            RateLimitDecision::Admitted(quota)
        } else {
            RateLimitDecision::Rejected {
                quota,
                retry_after_secs: retry_after_secs(quota.reset_at_ms, now_ms),
            }
        }
    }

    async fn sweep_expired(&self, now_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now_ms));
        before.saturating_sub(self.entries.len())
    }

    async fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}
