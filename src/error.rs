//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
///
/// `NotFound` and `Io` are kept apart on purpose: the read-through helper
/// treats a missing key as a miss but applies its configured policy to
/// storage failures.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Backend storage or transport failure
    #[error("Backend I/O error: {0}")]
    Io(String),

    /// Stored bytes could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Upstream provider call failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// Returns true for the "key absent or expired" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Io(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for CacheError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        CacheError::Io(format!("connection pool: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
