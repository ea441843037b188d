//! Compute backend for the Nimbus provisioning core
//!
//! Node creation on the compute backend implicitly requires a shared
//! network and a set of firewall rules for the node's logical group;
//! node teardown must garbage-collect those resources once no managed
//! node references them. This crate implements both sides:
//!
//! - [`DependencyResolver`] finds-or-creates the shared network
//!   (single-flight per `(group, address range)` key) and the firewall
//!   rules for the requested inbound ports, waiting on every creation
//!   operation before returning. Provisioning failures are fatal: a node
//!   with a partial firewall set may be unreachable.
//! - [`OrphanReconciler`] runs after node destruction with metadata
//!   captured before deletion, and deletes the group's firewalls and
//!   network once the last live member is gone. Cleanup is best-effort:
//!   individual failures are logged and skipped, never aborting the
//!   pass.
//!
//! The provider API itself is behind the [`ComputeApi`] trait,
//! implemented by the authenticated HTTP layer.

pub mod api;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use api::ComputeApi;
pub use error::{ComputeError, Result};
pub use model::{Firewall, FirewallRule, Network, NodeMetadata};
pub use reconcile::OrphanReconciler;
pub use resolver::{DependencyResolver, NetworkKey, ANY_RANGE, DEFAULT_INTERNAL_RANGE};
