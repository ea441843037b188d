//! In-memory compute API recording every call, for component tests

use crate::api::ComputeApi;
use crate::model::{Firewall, Network, NodeMetadata};
use async_trait::async_trait;
use nimbus_cloud::{CloudError, Operation, OperationService, OperationStatus, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Fake provider backed by in-memory maps
///
/// Mutations return already-`DONE` operations so poll loops finish on the
/// first fetch. `calls` records method names in invocation order.
#[derive(Default)]
pub(crate) struct RecordingApi {
    networks: Mutex<HashMap<String, Network>>,
    firewalls: Mutex<Vec<Firewall>>,
    nodes: Mutex<Vec<NodeMetadata>>,
    calls: Mutex<Vec<String>>,
    operations: Mutex<HashMap<String, Operation>>,
    next_op: AtomicU64,
    create_delay: Option<Duration>,
    firewall_op_error: Option<(u16, String)>,
    delete_failures: Mutex<Vec<String>>,
}

impl RecordingApi {
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Make every firewall mutation complete-but-fail with this HTTP error
    pub fn with_failing_firewall_ops(mut self, code: u16, message: &str) -> Self {
        self.firewall_op_error = Some((code, message.to_string()));
        self
    }

    pub fn seed_network(&self, name: &str, range: &str) {
        let network = Network {
            name: name.to_string(),
            self_link: format!("https://compute.example/networks/{name}"),
            ipv4_range: range.to_string(),
        };
        self.networks.lock().unwrap().insert(name.to_string(), network);
    }

    pub fn seed_firewall(&self, name: &str, network_link: &str) {
        self.firewalls.lock().unwrap().push(Firewall {
            name: name.to_string(),
            network: network_link.to_string(),
            allowed: Vec::new(),
            source_ranges: Vec::new(),
            source_tags: Vec::new(),
            target_tags: Vec::new(),
        });
    }

    pub fn seed_node(&self, name: &str) {
        self.nodes.lock().unwrap().push(NodeMetadata::new(name));
    }

    /// Reject deletion of the named resource with a transport error
    pub fn fail_deletion_of(&self, name: &str) {
        self.delete_failures.lock().unwrap().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(method)).count()
    }

    pub fn network_names(&self) -> Vec<String> {
        self.networks.lock().unwrap().keys().cloned().collect()
    }

    pub fn firewall_names(&self) -> Vec<String> {
        self.firewalls.lock().unwrap().iter().map(|f| f.name.clone()).collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn done_operation(&self, target: &str, error: Option<&(u16, String)>) -> Operation {
        let id = self.next_op.fetch_add(1, Ordering::SeqCst);
        let mut op = Operation::new(format!("operation-{id}"), OperationStatus::Done);
        op.target_id = Some(target.to_string());
        if let Some((code, message)) = error {
            op.http_error_status_code = Some(*code);
            op.http_error_message = Some(message.clone());
        }
        self.operations
            .lock()
            .unwrap()
            .insert(op.name.clone(), op.clone());
        op
    }

    fn check_deletable(&self, name: &str) -> Result<()> {
        if self.delete_failures.lock().unwrap().iter().any(|n| n == name) {
            return Err(CloudError::Transport(format!("connection reset deleting {name}")));
        }
        Ok(())
    }
}

#[async_trait]
impl OperationService for RecordingApi {
    async fn fetch(&self, name: &str) -> Result<Operation> {
        self.record(format!("fetch:{name}"));
        // Operations complete instantly in the fake
        let known = self.operations.lock().unwrap().get(name).cloned();
        Ok(known.unwrap_or_else(|| Operation::new(name, OperationStatus::Done)))
    }
}

#[async_trait]
impl ComputeApi for RecordingApi {
    async fn create_network(&self, name: &str, address_range: &str) -> Result<Network> {
        self.record(format!("create_network:{name}"));
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let network = Network {
            name: name.to_string(),
            self_link: format!("https://compute.example/networks/{name}"),
            ipv4_range: address_range.to_string(),
        };
        self.networks
            .lock()
            .unwrap()
            .insert(name.to_string(), network.clone());
        Ok(network)
    }

    async fn get_network(&self, name: &str) -> Result<Option<Network>> {
        self.record(format!("get_network:{name}"));
        Ok(self.networks.lock().unwrap().get(name).cloned())
    }

    async fn delete_network(&self, name: &str) -> Result<Operation> {
        self.record(format!("delete_network:{name}"));
        self.check_deletable(name)?;
        self.networks.lock().unwrap().remove(name);
        Ok(self.done_operation(name, None))
    }

    async fn create_firewall(&self, firewall: &Firewall) -> Result<Operation> {
        self.record(format!("create_firewall:{}", firewall.name));
        if self.firewall_op_error.is_none() {
            self.firewalls.lock().unwrap().push(firewall.clone());
        }
        Ok(self.done_operation(&firewall.name, self.firewall_op_error.as_ref()))
    }

    async fn delete_firewall(&self, name: &str) -> Result<Operation> {
        self.record(format!("delete_firewall:{name}"));
        self.check_deletable(name)?;
        self.firewalls.lock().unwrap().retain(|f| f.name != name);
        Ok(self.done_operation(name, None))
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        self.record("list_firewalls");
        Ok(self.firewalls.lock().unwrap().clone())
    }

    async fn list_nodes(&self) -> Result<Vec<NodeMetadata>> {
        self.record("list_nodes");
        Ok(self.nodes.lock().unwrap().clone())
    }
}
