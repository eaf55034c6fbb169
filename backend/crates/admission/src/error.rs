//! Admission Error Types
//!
//! Admission-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::QuotaSnapshot;
use crate::presentation::dto::RateLimitedResponse;
use crate::presentation::headers::apply_quota_headers;

/// Admission-specific result type alias
pub type AdmissionResult<T> = Result<T, AdmissionError>;

#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Client spent its quota for the current window
    #[error("Rate limit exceeded. Maximum {} requests per {window}.", .quota.limit)]
    RateLimited {
        quota: QuotaSnapshot,
        retry_after_secs: u64,
        window: String,
    },

    #[error("Invalid admission configuration: {0}")]
    InvalidConfig(String),
}

impl AdmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdmissionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AdmissionError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdmissionError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AdmissionError::InvalidConfig(_) => ErrorKind::InternalServerError,
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            AdmissionError::RateLimited {
                retry_after_secs, ..
            } => AppError::new(kind, message)
                .with_action(format!("Retry after {} seconds", retry_after_secs)),
            AdmissionError::InvalidConfig(_) => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            AdmissionError::RateLimited {
                quota,
                retry_after_secs,
                ..
            } => {
                let body = RateLimitedResponse {
                    error: "Too many requests".to_string(),
                    message,
                    retry_after: retry_after_secs,
                };

                let mut headers = HeaderMap::new();
                headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                apply_quota_headers(&mut headers, &quota);

                (status, headers, Json(body)).into_response()
            }
            AdmissionError::InvalidConfig(_) => {
                tracing::error!(message = %message, "Admission misconfigured");
                AppError::from(self).into_response()
            }
        }
    }
}
