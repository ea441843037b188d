//! Compute provider collaborator interface

use crate::model::{Firewall, Network, NodeMetadata};
use async_trait::async_trait;
use nimbus_cloud::{Operation, OperationService, Result};

/// Compute provider API surface consumed by provisioning and cleanup
///
/// Implemented by the authenticated HTTP layer; every method is a single
/// synchronous call against the provider, with transport retry handled
/// below this trait. Mutations return an [`Operation`] to be tracked via
/// the [`OperationService`] supertrait.
#[async_trait]
pub trait ComputeApi: OperationService {
    /// Create a network; the provider resolves this synchronously
    async fn create_network(&self, name: &str, address_range: &str) -> Result<Network>;

    async fn get_network(&self, name: &str) -> Result<Option<Network>>;

    async fn delete_network(&self, name: &str) -> Result<Operation>;

    async fn create_firewall(&self, firewall: &Firewall) -> Result<Operation>;

    async fn delete_firewall(&self, name: &str) -> Result<Operation>;

    /// List the provider's global firewall set
    async fn list_firewalls(&self) -> Result<Vec<Firewall>>;

    /// List currently live nodes; terminated nodes are not reported
    async fn list_nodes(&self) -> Result<Vec<NodeMetadata>>;
}
