//! Check And Admit Use Case

use crate::application::config::AdmissionConfig;
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::{ClientKey, QuotaSnapshot, RateLimitDecision};
use crate::error::{AdmissionError, AdmissionResult};
use std::sync::Arc;

/// Check And Admit Use Case
pub struct CheckAndAdmitUseCase<S>
where
    S: RateLimitStore,
{
    store: Arc<S>,
    config: Arc<AdmissionConfig>,
}

impl<S> CheckAndAdmitUseCase<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>, config: Arc<AdmissionConfig>) -> Self {
        Self { store, config }
    }

    /// Admit the request or fail with `AdmissionError::RateLimited`
    pub async fn execute(&self, key: &ClientKey, now_ms: i64) -> AdmissionResult<QuotaSnapshot> {
        let decision = self
            .store
            .check_and_admit(key, &self.config.policy(), now_ms)
            .await;

        match decision {
            RateLimitDecision::Admitted(quota) => {
                tracing::debug!(
                    client_key = %key,
                    remaining = quota.remaining,
                    "Request admitted"
                );
                Ok(quota)
            }
            RateLimitDecision::Rejected {
                quota,
                retry_after_secs,
            } => {
                tracing::warn!(
                    client_key = %key,
                    limit = quota.limit,
                    retry_after_secs = retry_after_secs,
                    "Rate limit exceeded"
                );
                Err(AdmissionError::RateLimited {
                    quota,
                    retry_after_secs,
                    window: self.config.window_description(),
                })
            }
        }
    }
}
