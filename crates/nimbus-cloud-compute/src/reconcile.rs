//! Garbage collection of shared resources for emptied node groups
//!
//! Invoked after node-destroy calls return, with metadata captured
//! before deletion. Cleanup is best-effort by design: a resource may
//! already be mid-deletion from a concurrent caller, so individual
//! failures are logged and skipped rather than aborting the pass. This
//! is the deliberate opposite of the fatal provisioning policy in
//! [`crate::resolver`].

use crate::api::ComputeApi;
use crate::model::NodeMetadata;
use futures_util::future::join_all;
use nimbus_cloud::{NamingConvention, OperationPoller, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Deletes the shared network and firewalls of groups with no live nodes
pub struct OrphanReconciler {
    api: Arc<dyn ComputeApi>,
    poller: OperationPoller,
    naming: NamingConvention,
}

impl OrphanReconciler {
    pub fn new(api: Arc<dyn ComputeApi>, poller: OperationPoller, naming: NamingConvention) -> Self {
        Self { api, poller, naming }
    }

    /// Reconcile the groups referenced by `dead_nodes`.
    ///
    /// Groups are cleaned independently and concurrently; within one
    /// group the firewalls go strictly before the network, because the
    /// provider refuses to delete a network with dependent rules.
    pub async fn reconcile(&self, dead_nodes: &[NodeMetadata]) {
        let groups: BTreeSet<String> = dead_nodes
            .iter()
            .filter_map(|node| self.naming.group_of(&node.name))
            .collect();

        join_all(groups.iter().map(|group| self.reconcile_group(group))).await;
    }

    async fn reconcile_group(&self, group: &str) {
        let live = match self.api.list_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!("skipping cleanup for group {group}: node listing failed: {e}");
                return;
            }
        };

        let remaining = live
            .iter()
            .filter(|node| self.naming.group_of(&node.name).as_deref() == Some(group))
            .count();
        if remaining > 0 {
            tracing::debug!("group {group} still has {remaining} live nodes, keeping shared resources");
            return;
        }

        let network_name = self.naming.shared_resource_name(group);
        let network = match self.api.get_network(&network_name).await {
            Ok(Some(network)) => network,
            Ok(None) => {
                tracing::debug!("group {group} has no shared network to clean up");
                return;
            }
            Err(e) => {
                tracing::warn!("skipping cleanup for group {group}: network lookup failed: {e}");
                return;
            }
        };

        tracing::info!("group {group} is orphaned, deleting shared resources");

        match self.api.list_firewalls().await {
            Ok(firewalls) => {
                for firewall in firewalls.iter().filter(|f| f.network == network.self_link) {
                    if let Err(e) = self.delete_firewall(&firewall.name).await {
                        tracing::warn!("failed to delete firewall {}: {e}", firewall.name);
                    }
                }
            }
            Err(e) => tracing::warn!("firewall listing failed for group {group}: {e}"),
        }

        if let Err(e) = self.delete_network(&network_name).await {
            tracing::warn!("failed to delete network {network_name}: {e}");
        }
    }

    async fn delete_firewall(&self, name: &str) -> Result<()> {
        tracing::info!("deleting orphaned firewall {name}");
        let operation = self.api.delete_firewall(name).await?;
        self.poller.await_success(operation, &*self.api).await?;
        Ok(())
    }

    async fn delete_network(&self, name: &str) -> Result<()> {
        tracing::info!("deleting orphaned network {name}");
        let operation = self.api.delete_network(name).await?;
        self.poller.await_success(operation, &*self.api).await?;
        Ok(())
    }
}
