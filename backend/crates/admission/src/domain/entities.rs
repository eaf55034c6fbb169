//! Domain Entities

use crate::domain::value_objects::{QuotaSnapshot, WindowPolicy};

/// Request counter of one client for one fixed window
///
/// Active while `now_ms < window_reset_at_ms`; expired entries are treated
/// as absent and replaced on the next access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at_ms: i64,
}

impl RateLimitEntry {
    /// Open a fresh window starting at `now_ms`
    pub fn open(now_ms: i64, window_ms: i64) -> Self {
        Self {
            count: 0,
            window_reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.window_reset_at_ms
    }

    /// Count the request if quota is left. Returns whether it was admitted.
    pub fn try_admit(&mut self, max_requests: u32) -> bool {
        if self.count >= max_requests {
            return false;
        }
        self.count += 1;
        true
    }

    pub fn remaining(&self, max_requests: u32) -> u32 {
        max_requests.saturating_sub(self.count)
    }

    pub fn snapshot(&self, policy: &WindowPolicy) -> QuotaSnapshot {
        QuotaSnapshot {
            limit: policy.max_requests,
            remaining: self.remaining(policy.max_requests),
            reset_at_ms: self.window_reset_at_ms,
        }
    }
}
