//! Error types for the content cache service
//!
//! Cache faults (`CacheError`) are absorbed by the orchestrator and never reach a client.
//! Everything else travels as `ServiceError` and is mapped onto an HTTP status here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Faults raised by a cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend could not be reached or failed mid-command
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the entry (size limits, capacity)
    #[error("Cache rejected entry: {0}")]
    Rejected(String),
}

// == Service Error Enum ==
/// Unified error type for reads and writes against the content store.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Referenced item or comment is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Principal does not own the resource being mutated
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or malformed fields on a request
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Write attempted without a principal
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Content store could not serve the request
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn item_not_found(id: i64) -> Self {
        Self::NotFound(format!("item {id}"))
    }

    pub fn comment_not_found(id: i64) -> Self {
        Self::NotFound(format!("comment {id}"))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ServiceError::item_not_found(7), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("item 7".into()), StatusCode::FORBIDDEN),
            (ServiceError::Validation("title".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("missing".into()), StatusCode::UNAUTHORIZED),
            (
                ServiceError::StoreUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ServiceError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = ServiceError::comment_not_found(3).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "Not found: comment 3");
    }
}
