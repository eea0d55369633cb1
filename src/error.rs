//! Error types for the order service
//!
//! Provides the error taxonomy shared by the cache-aside layer, the durable
//! store collaborators and the HTTP surface, using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Validation Error ==
/// First structural problem found in an order or request.
///
/// `group` names the failing field group (`order`, `delivery`, `payment`,
/// `items`), `reason` the first failing field inside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{group} validation failed: {reason}")]
pub struct ValidationError {
    pub group: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(group: &'static str, reason: impl Into<String>) -> Self {
        Self {
            group,
            reason: reason.into(),
        }
    }
}

// == Store Error ==
/// Failure reported by a durable store collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists for the identifier
    #[error("order not found: {0}")]
    NotFound(String),

    /// The caller's context was cancelled before the store answered
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline elapsed before the store answered
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted record could not be read back
    #[error("corrupt record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true when the failure came from the caller's context rather
    /// than from the store itself.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled | StoreError::DeadlineExceeded)
    }
}

// == Service Error ==
/// Error returned by every `OrderService` operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Input failed the structural contract; nothing was touched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Identifier absent from both the cache and the store
    #[error("order not found: {0}")]
    NotFound(String),

    /// Store call failed for a reason other than "not found"
    #[error("store error: {0}")]
    Store(#[source] StoreError),

    /// Cache restore failed; the service must not accept traffic
    #[error("initialization failed: {0}")]
    Initialization(#[source] StoreError),
}

impl ServiceError {
    /// Returns true when the operation was aborted by cancellation or an
    /// expired deadline.
    pub fn is_cancelled(&self) -> bool {
        match self {
            ServiceError::Store(err) | ServiceError::Initialization(err) => err.is_cancelled(),
            _ => false,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(uid) => ServiceError::NotFound(uid),
            other => ServiceError::Store(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            err if err.is_cancelled() => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Store(_) | ServiceError::Initialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
