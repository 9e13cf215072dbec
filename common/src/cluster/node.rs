use std::fmt;

/// Address type the cluster API tags a node's public address with.
pub const EXTERNAL_IP: &str = "ExternalIP";

/// One entry of a node's `status.addresses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddress {
    pub kind: String,
    pub address: String,
}

impl NodeAddress {
    pub fn new(kind: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            address: address.into(),
        }
    }
}

/// What discovery needs to know about a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub addresses: Vec<NodeAddress>,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, addresses: Vec<NodeAddress>) -> Self {
        Self {
            name: name.into(),
            addresses,
        }
    }

    /// First non-blank address tagged [`EXTERNAL_IP`].
    pub fn external_ip(&self) -> Option<&str> {
        self.addresses
            .iter()
            .filter(|addr| addr.kind == EXTERNAL_IP)
            .map(|addr| addr.address.trim())
            .find(|address| !address.is_empty())
    }
}

/// An ingress route and the hosts its ingress controllers admitted.
///
/// A host may be empty while the route waits for admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub namespace: String,
    pub name: String,
    pub hosts: Vec<String>,
}

/// Identity of one unit of node work: a node of a target cluster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    pub context: String,
    pub node: String,
}

impl NodeRef {
    pub fn new(context: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            node: node.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.context, self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_ip_ignores_internal_addresses() {
        let node = NodeInfo::new(
            "worker-0",
            vec![
                NodeAddress::new("InternalIP", "192.168.1.10"),
                NodeAddress::new("Hostname", "worker-0"),
                NodeAddress::new(EXTERNAL_IP, "34.1.2.3"),
            ],
        );
        assert_eq!(node.external_ip(), Some("34.1.2.3"));
    }

    #[test]
    fn external_ip_missing() {
        let node = NodeInfo::new("worker-0", vec![NodeAddress::new("InternalIP", "192.168.1.10")]);
        assert_eq!(node.external_ip(), None);
    }

    #[test]
    fn blank_external_ip_counts_as_missing() {
        let node = NodeInfo::new("worker-0", vec![NodeAddress::new(EXTERNAL_IP, "  ")]);
        assert_eq!(node.external_ip(), None);

        let node = NodeInfo::new(
            "worker-0",
            vec![
                NodeAddress::new(EXTERNAL_IP, ""),
                NodeAddress::new(EXTERNAL_IP, " 34.1.2.3 "),
            ],
        );
        assert_eq!(node.external_ip(), Some("34.1.2.3"));
    }
}
