//! Find-or-create of the shared network and firewall set for a group
//!
//! Multiple node creations in the same group race on this component, so
//! network creation is serialized per `(name, address range)` key. This
//! is the one place in the core that needs true mutual exclusion.

use crate::api::ComputeApi;
use crate::error::{ComputeError, Result};
use crate::model::{Firewall, FirewallRule, Network};
use nimbus_cloud::{NamingConvention, Operation, OperationPoller};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Internal address range assigned to lazily created networks
pub const DEFAULT_INTERNAL_RANGE: &str = "10.0.0.0/8";

/// The external "anywhere" range
pub const ANY_RANGE: &str = "0.0.0.0/0";

/// Cache key for the shared network of a group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkKey {
    pub name: String,
    pub address_range: String,
}

/// Ensures the shared network and firewall rules a node group depends on
///
/// `ensure` is idempotent with respect to resource names: re-running
/// with the same group and ports after a success is a no-op. Concurrent
/// calls for the same key coalesce into a single network creation.
pub struct DependencyResolver {
    api: Arc<dyn ComputeApi>,
    poller: OperationPoller,
    naming: NamingConvention,
    networks: Mutex<HashMap<NetworkKey, Arc<OnceCell<Network>>>>,
}

impl DependencyResolver {
    pub fn new(api: Arc<dyn ComputeApi>, poller: OperationPoller, naming: NamingConvention) -> Self {
        Self {
            api,
            poller,
            naming,
            networks: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure the network and firewall rules for `group` exist.
    ///
    /// When `existing_network` is given it is used as-is instead of the
    /// derived shared network. Returns the network and the firewall
    /// rules covering `ports` (pre-existing and newly created). Any
    /// firewall operation that completes with an HTTP error fails the
    /// whole call: a node pointing at a partial firewall set may be
    /// unreachable.
    pub async fn ensure(
        &self,
        group: &str,
        ports: &[u16],
        existing_network: Option<&str>,
    ) -> Result<(Network, Vec<Firewall>)> {
        let network = match existing_network {
            Some(name) => self
                .api
                .get_network(name)
                .await?
                .ok_or_else(|| ComputeError::NetworkNotFound(name.to_string()))?,
            None => {
                let key = NetworkKey {
                    name: self.naming.shared_resource_name(group),
                    address_range: DEFAULT_INTERNAL_RANGE.to_string(),
                };
                self.find_or_create_network(key).await?
            }
        };

        let firewalls = self.ensure_firewalls(group, ports, &network).await?;
        Ok((network, firewalls))
    }

    /// Single-flight get-or-create keyed by `(name, address range)`
    async fn find_or_create_network(&self, key: NetworkKey) -> Result<Network> {
        let cell = {
            let mut networks = self.networks.lock().await;
            Arc::clone(networks.entry(key.clone()).or_default())
        };

        let network = cell
            .get_or_try_init(|| async {
                if let Some(existing) = self.api.get_network(&key.name).await? {
                    tracing::debug!("reusing shared network {}", existing.name);
                    return Ok(existing);
                }
                tracing::info!(
                    "creating shared network {} ({})",
                    key.name,
                    key.address_range
                );
                self.api.create_network(&key.name, &key.address_range).await
            })
            .await?;

        Ok(network.clone())
    }

    async fn ensure_firewalls(
        &self,
        group: &str,
        ports: &[u16],
        network: &Network,
    ) -> Result<Vec<Firewall>> {
        let existing = self.api.list_firewalls().await?;

        let mut applied = Vec::with_capacity(ports.len());
        let mut pending: Vec<(Firewall, Operation)> = Vec::new();

        for &port in ports {
            let rule_name = self.naming.firewall_rule_name(group, port);
            if let Some(found) = existing.iter().find(|f| f.name == rule_name) {
                tracing::debug!("firewall rule {} already present", rule_name);
                applied.push(found.clone());
                continue;
            }

            let firewall = Firewall {
                name: rule_name.clone(),
                network: network.self_link.clone(),
                allowed: vec![
                    FirewallRule::port("tcp", port),
                    FirewallRule::port("udp", port),
                ],
                source_ranges: vec![
                    DEFAULT_INTERNAL_RANGE.to_string(),
                    ANY_RANGE.to_string(),
                ],
                source_tags: vec![rule_name.clone()],
                target_tags: vec![rule_name.clone()],
            };

            tracing::info!("creating firewall rule {} (port {})", firewall.name, port);
            let operation = self.api.create_firewall(&firewall).await?;
            pending.push((firewall, operation));
        }

        for (firewall, operation) in pending {
            self.poller
                .await_success(operation, &*self.api)
                .await
                .map_err(|source| ComputeError::Provisioning {
                    group: group.to_string(),
                    source,
                })?;
            applied.push(firewall);
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingApi;
    use std::time::Duration;

    fn resolver(api: Arc<RecordingApi>) -> DependencyResolver {
        DependencyResolver::new(api, OperationPoller::default(), NamingConvention::default())
    }

    #[tokio::test]
    async fn creates_network_and_firewalls_on_first_ensure() {
        let api = Arc::new(RecordingApi::default());
        let resolver = resolver(Arc::clone(&api));

        let (network, firewalls) = resolver.ensure("web", &[22, 8080], None).await.unwrap();

        assert_eq!(network.name, "nimbus-web");
        assert_eq!(network.ipv4_range, DEFAULT_INTERNAL_RANGE);
        assert_eq!(firewalls.len(), 2);
        assert_eq!(firewalls[0].name, "nimbus-web-port-22");
        assert_eq!(firewalls[0].network, network.self_link);
        assert_eq!(firewalls[0].source_ranges, vec![DEFAULT_INTERNAL_RANGE, ANY_RANGE]);
        assert_eq!(firewalls[0].source_tags, vec!["nimbus-web-port-22"]);
        assert_eq!(firewalls[0].target_tags, vec!["nimbus-web-port-22"]);
        let protocols: Vec<&str> = firewalls[0]
            .allowed
            .iter()
            .map(|r| r.ip_protocol.as_str())
            .collect();
        assert_eq!(protocols, vec!["tcp", "udp"]);

        assert_eq!(api.count("create_network"), 1);
        assert_eq!(api.count("create_firewall"), 2);
    }

    #[tokio::test]
    async fn concurrent_ensures_create_the_network_once() {
        let api = Arc::new(RecordingApi::default().with_create_delay(Duration::from_millis(20)));
        let resolver = resolver(Arc::clone(&api));

        let (a, b) = tokio::join!(
            resolver.ensure("web", &[80], None),
            resolver.ensure("web", &[80], None),
        );
        let (network_a, _) = a.unwrap();
        let (network_b, _) = b.unwrap();

        assert_eq!(network_a, network_b);
        assert_eq!(api.count("create_network"), 1);
    }

    #[tokio::test]
    async fn second_ensure_is_a_no_op() {
        let api = Arc::new(RecordingApi::default());
        let resolver = resolver(Arc::clone(&api));

        resolver.ensure("web", &[443], None).await.unwrap();
        let (_, firewalls) = resolver.ensure("web", &[443], None).await.unwrap();

        assert_eq!(firewalls.len(), 1);
        assert_eq!(api.count("create_network"), 1);
        assert_eq!(api.count("create_firewall"), 1);
    }

    #[tokio::test]
    async fn supplied_network_skips_creation() {
        let api = Arc::new(RecordingApi::default());
        api.seed_network("custom-net", "192.168.0.0/16");
        let resolver = resolver(Arc::clone(&api));

        let (network, _) = resolver.ensure("web", &[], Some("custom-net")).await.unwrap();

        assert_eq!(network.name, "custom-net");
        assert_eq!(api.count("create_network"), 0);
    }

    #[tokio::test]
    async fn missing_supplied_network_is_an_error() {
        let api = Arc::new(RecordingApi::default());
        let resolver = resolver(api);

        let err = resolver.ensure("web", &[], Some("ghost")).await.unwrap_err();
        assert!(matches!(err, ComputeError::NetworkNotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn failed_firewall_operation_fails_the_whole_ensure() {
        let api = Arc::new(RecordingApi::default().with_failing_firewall_ops(409, "conflict"));
        let resolver = resolver(Arc::clone(&api));

        let err = resolver.ensure("web", &[22], None).await.unwrap_err();
        match err {
            ComputeError::Provisioning { group, source } => {
                assert_eq!(group, "web");
                assert!(matches!(
                    source,
                    nimbus_cloud::CloudError::OperationFailed { .. }
                ));
            }
            other => panic!("expected provisioning failure, got {other}"),
        }
    }
}
