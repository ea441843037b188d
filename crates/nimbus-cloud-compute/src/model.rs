//! Network and firewall resource model
//!
//! Only the resources participating in provisioning and cleanup are
//! modeled; everything else the provider exposes stays opaque to the
//! core.

use serde::{Deserialize, Serialize};

/// A shared network, referenced (not owned) by every node of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,

    /// Canonical URL other resources use to reference this network
    pub self_link: String,

    /// Internal address range, e.g. `10.0.0.0/8`
    #[serde(rename = "IPv4Range")]
    pub ipv4_range: String,
}

/// A firewall rule attached to a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firewall {
    pub name: String,

    /// Self-link of the network this rule belongs to
    pub network: String,

    pub allowed: Vec<FirewallRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ranges: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_tags: Vec<String>,
}

/// One allowed protocol/port combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,

    /// Port list; empty means all ports for the protocol
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
}

impl FirewallRule {
    pub fn port(protocol: impl Into<String>, port: u16) -> Self {
        Self {
            ip_protocol: protocol.into(),
            ports: vec![port.to_string()],
        }
    }
}

/// Minimal node record used for group liveness checks
///
/// The reconciler consumes snapshots captured before node deletion,
/// because most providers stop reporting terminated nodes in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub name: String,

    /// Self-link of the network the node is attached to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl NodeMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), network: None }
    }
}
