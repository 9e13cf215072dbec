use crate::network::AddressSet;

/// The cluster that must become unreachable from the targets.
///
/// Built once by a single inspection and never mutated afterwards, so it can
/// be shared between node tasks without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedCluster {
    pub context: String,
    /// External IPs of every node.
    pub node_addresses: AddressSet,
    /// Every address the API server hostname resolves to.
    pub api_server_addresses: AddressSet,
    /// Every address behind an externally exposed ingress route.
    pub route_addresses: AddressSet,
}

impl BlockedCluster {
    pub fn new(
        context: impl Into<String>,
        node_addresses: AddressSet,
        api_server_addresses: AddressSet,
        route_addresses: AddressSet,
    ) -> Self {
        Self {
            context: context.into(),
            node_addresses,
            api_server_addresses,
            route_addresses,
        }
    }

    /// Sorted, deduplicated union of every address that must be blocked.
    ///
    /// Recomputed on each call.
    pub fn all_addresses(&self) -> AddressSet {
        self.node_addresses
            .union(&self.api_server_addresses)
            .union(&self.route_addresses)
    }
}
