//! Error types for the bitonic server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Bitonic Error Enum ==
/// Unified error type for sequence generation, validation and caching.
///
/// Only `InvalidRange`, `InvalidRequest` and `Internal` ever reach an HTTP
/// client. Infeasibility is reported as a normal outcome by the service and
/// store failures are absorbed by the result cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitonicError {
    /// Malformed `n`/`low`/`high` relationship
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// No bitonic sequence of the requested length fits in the range
    #[error("Infeasible range: length {n} exceeds maximum of {max_length}")]
    InfeasibleRange { n: usize, max_length: u64 },

    /// Key not found in the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Backing store could not serve the operation
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BitonicError {
    /// Returns true for store-level errors that callers treat as a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, BitonicError::NotFound(_) | BitonicError::Expired(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for BitonicError {
    fn into_response(self) -> Response {
        let status = match &self {
            BitonicError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            BitonicError::InfeasibleRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BitonicError::NotFound(_) => StatusCode::NOT_FOUND,
            BitonicError::Expired(_) => StatusCode::NOT_FOUND,
            BitonicError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BitonicError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BitonicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the bitonic server.
pub type Result<T> = std::result::Result<T, BitonicError>;
