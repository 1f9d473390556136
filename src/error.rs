//! Error types for the virtual file pipeline
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Vfs Error Enum ==
/// Unified error type for key handling, both stores, rendering and the file driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VfsError {
    /// Path has no extractable key or is only a relative-path marker
    #[error("wrong path")]
    InvalidPath,

    /// Template id or data key does not resolve (missing, expired, unparsable, outside the root)
    #[error("not found: {0}")]
    NotFound(String),

    /// Template executed but failed against the supplied payload
    #[error("render error: {0}")]
    Render(String),

    /// Template source could not be parsed
    #[error("template syntax error: {0}")]
    Syntax(String),

    /// Mutating or listing operation on the read-only tree
    #[error("operation isn't supported")]
    Unsupported,

    /// Read offset outside the content bounds
    #[error("end of data")]
    EndOfData,

    /// Opaque failure reported at the stat/read boundary
    #[error("file unavailable")]
    Unavailable,

    /// No substring matching the key pattern
    #[error("key not found in string")]
    KeyNotFound,

    /// Cache is full and eviction failed
    #[error("cache full: {0}")]
    CacheFull(String),

    /// Invalid configuration or missing dependency at construction time
    #[error("invalid configuration: {0}")]
    Config(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for VfsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            VfsError::InvalidPath
            | VfsError::NotFound(_)
            | VfsError::Render(_)
            | VfsError::Unavailable => (StatusCode::NOT_FOUND, VfsError::Unavailable.to_string()),
            VfsError::Unsupported => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            VfsError::EndOfData => (StatusCode::RANGE_NOT_SATISFIABLE, self.to_string()),
            VfsError::KeyNotFound | VfsError::Syntax(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            VfsError::CacheFull(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            VfsError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, VfsError>;
