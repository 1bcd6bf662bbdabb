//! Error types for the campus core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Core Error Enum ==
/// Unified error type for the caching, tracking and scheduling core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Caller misuse: absent dataset, untrackable entity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Business rule violation (scheduling conflicts, illegal state changes)
    #[error("Domain error: {0}")]
    Domain(String),

    /// Entity failed one or more validation rules
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CoreError::Domain(_) => StatusCode::CONFLICT,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the campus core.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (CoreError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::Domain("x".into()), StatusCode::CONFLICT),
            (CoreError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (CoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_display() {
        let error = CoreError::Domain("failed to schedule lecture".to_string());
        assert_eq!(error.to_string(), "Domain error: failed to schedule lecture");
    }
}
