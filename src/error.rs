//! Error types for the notebook store
//!
//! The cache engine itself cannot fail; every error a caller sees comes from
//! the underlying store and passes through the caching layer unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failure reported by a notebook store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entity of `kind` exists under `id`
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Rejected input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing store failed
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (StoreError::not_found("notebook", "nb-1"), StatusCode::NOT_FOUND),
            (StoreError::InvalidInput("bad".to_string()), StatusCode::BAD_REQUEST),
            (
                StoreError::Backend("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should map to correct HTTP status"
            );
        }
    }

    #[test]
    fn test_not_found_message() {
        let error = StoreError::not_found("note", "n-42");
        assert_eq!(error.to_string(), "note not found: n-42");
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = StoreError::InvalidInput("name is required".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "Invalid input: name is required");
    }
}
