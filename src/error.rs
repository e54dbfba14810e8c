//! Error types for the tiered cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration rejected at startup
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote tier could not be reached while constructing it
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Redis protocol or I/O failure
    #[error("Remote store error: {0}")]
    Remote(#[from] redis::RedisError),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote call exceeded its I/O deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Payload larger than the whole local store
    #[error("Entry '{key}' of {size} bytes exceeds local capacity of {capacity} bytes")]
    EntryTooLarge {
        key: String,
        size: usize,
        capacity: usize,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::EntryTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::Connection(_) | CacheError::Remote(_) | CacheError::Timeout(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::InvalidConfig(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = CacheError::NotFound("k".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_entry_too_large_message() {
        let err = CacheError::EntryTooLarge {
            key: "big".to_string(),
            size: 10,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "Entry 'big' of 10 bytes exceeds local capacity of 4 bytes"
        );
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_serialization_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CacheError = bad.into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}
