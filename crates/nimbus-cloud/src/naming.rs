//! Deterministic resource naming
//!
//! Provisioning and cleanup must agree on the names of the shared
//! resources belonging to a logical node group, so both sides derive
//! them through the same convention instead of persisting a mapping.

/// Naming convention for group-scoped shared resources
///
/// Node names are shaped `{prefix}-{group}-{suffix}`; the shared network
/// is `{prefix}-{group}` and firewall rules are
/// `{prefix}-{group}-port-{port}`. Derivation is stable across calls for
/// the same group.
#[derive(Debug, Clone)]
pub struct NamingConvention {
    prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new("nimbus")
    }
}

impl NamingConvention {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Name of the shared network for a group
    pub fn shared_resource_name(&self, group: &str) -> String {
        format!("{}-{}", self.prefix, group)
    }

    /// Name of the firewall rule opening `port` for a group
    pub fn firewall_rule_name(&self, group: &str, port: u16) -> String {
        format!("{}-{}-port-{}", self.prefix, group, port)
    }

    /// Full node name for a group member
    pub fn node_name(&self, group: &str, suffix: &str) -> String {
        format!("{}-{}-{}", self.prefix, group, suffix)
    }

    /// Logical group of a node, derived from its name
    ///
    /// Returns `None` for nodes not managed under this convention.
    pub fn group_of(&self, node_name: &str) -> Option<String> {
        let rest = node_name.strip_prefix(&self.prefix)?.strip_prefix('-')?;
        // The suffix never contains a dash; the group may.
        match rest.rsplit_once('-') {
            Some((group, _suffix)) if !group.is_empty() => Some(group.to_string()),
            _ => None,
        }
    }
}
