//! Provisioning core error types

use crate::operation::Operation;
use thiserror::Error;

/// Errors surfaced by the provisioning core
///
/// Transport failures are never retried here; retrying transient network
/// errors belongs to the transport collaborator. An operation that reaches
/// `DONE` carrying an HTTP error is a completed-but-failed mutation and is
/// reported as [`CloudError::OperationFailed`], never re-polled.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation {} completed with error: {}", .operation.name, .operation.error_summary())]
    OperationFailed { operation: Operation },

    #[error("timeout waiting for operation: {}", .operation.name)]
    OperationTimeout { operation: Operation },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
