//! Error conversions - From implementations for common error types
//!
//! Conversion from database errors to [`AppError`], and the axum response
//! rendering.

use super::app_error::AppError;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database connection error").with_source(err)
            }
            sqlx::Error::Tls(_) => AppError::service_unavailable("Database TLS error").with_source(err),
            sqlx::Error::Database(db_err) => {
                // Class 53 (insufficient resources) and 57 (operator intervention)
                let unavailable = db_err
                    .code()
                    .is_some_and(|code| code.starts_with("53") || code.starts_with("57"));
                if unavailable {
                    AppError::service_unavailable("Database unavailable").with_source(err)
                } else {
                    AppError::internal("Database error").with_source(err)
                }
            }
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
            "instance": self.instance(),
        });

        (status, Json(body)).into_response()
    }
}
