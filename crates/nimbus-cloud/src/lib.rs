//! Nimbus Cloud Provisioning Core
//!
//! This crate provides the provider-neutral pieces of the Nimbus SDK:
//! the asynchronous operation model, operation completion tracking, the
//! shared resource naming convention, and the error taxonomy used by the
//! compute and storage backends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            nimbus-cloud-compute                  │
//! │  DependencyResolver    OrphanReconciler          │
//! └───────┬─────────────────────┬───────────────────┘
//!         │                     │
//! ┌───────▼─────────────────────▼───────────────────┐
//! │               nimbus-cloud                       │
//! │  Operation model │ OperationPoller │ naming      │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼─────────────────────────────────────────┐
//! │     authenticated HTTP transport (external)      │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Transport, authentication and wire-level request building live behind
//! the [`OperationService`] trait and the backend collaborator traits;
//! this crate never performs I/O of its own beyond sleeping between
//! polls.

pub mod error;
pub mod naming;
pub mod operation;
pub mod poll;

// Re-exports
pub use error::{CloudError, Result};
pub use naming::NamingConvention;
pub use operation::{Operation, OperationErrorItem, OperationService, OperationStatus};
pub use poll::{OperationPoller, PollConfig};
