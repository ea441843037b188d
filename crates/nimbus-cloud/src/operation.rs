//! Asynchronous operation model
//!
//! Every mutating compute call returns an `Operation` resource that must
//! be re-fetched until it reaches its terminal state. The snapshot held
//! by the SDK is only ever replaced wholesale by a fresh fetch.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Status of a provider-side asynchronous mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Queued, not yet started
    Pending,
    /// In progress
    Running,
    /// Terminal; never reverts
    Done,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::Running => write!(f, "running"),
            OperationStatus::Done => write!(f, "done"),
        }
    }
}

/// Handle for an in-progress asynchronous mutation
///
/// A `Done` operation with a non-null `http_error_status_code` is a
/// completed-but-failed mutation. That is a domain failure, distinct from
/// a transport failure, and callers decide whether it is fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation reference used to re-fetch the snapshot
    pub name: String,

    pub status: OperationStatus,

    /// Identifier of the resource the mutation targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_error_message: Option<String>,

    /// Ordered error items reported by the provider
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OperationErrorItem>,
}

impl Operation {
    pub fn new(name: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            name: name.into(),
            status,
            target_id: None,
            http_error_status_code: None,
            http_error_message: None,
            errors: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// HTTP error code when this operation completed-but-failed
    pub fn error_code(&self) -> Option<u16> {
        self.http_error_status_code
    }

    /// Human-readable summary of the failure, for error messages
    pub fn error_summary(&self) -> String {
        match (self.http_error_status_code, &self.http_error_message) {
            (Some(code), Some(message)) => format!("HTTP {code} {message}"),
            (Some(code), None) => format!("HTTP {code}"),
            (None, Some(message)) => message.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// One structured error item attached to an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationErrorItem {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub message: String,
}

/// Single status fetch for a tracked operation
///
/// Implemented by the authenticated HTTP layer. A fetch may fail with a
/// transport error; the core propagates that immediately instead of
/// retrying past the current poll tick.
#[async_trait]
pub trait OperationService: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Operation>;
}
