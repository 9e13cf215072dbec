use super::{BlockedCluster, NodeRef};

/// A cluster whose nodes get the blackhole routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCluster {
    pub context: String,
    /// Node names in the order the API listed them.
    pub node_names: Vec<String>,
}

impl TargetCluster {
    pub fn new(context: impl Into<String>, node_names: Vec<String>) -> Self {
        Self {
            context: context.into(),
            node_names,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.node_names
            .iter()
            .map(|node| NodeRef::new(&self.context, node))
    }
}

/// Everything a successful inspection phase learned.
///
/// Block, unblock and status all take an `Inventory`, so none of them can run
/// before inspection succeeded.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub blocked: BlockedCluster,
    pub targets: Vec<TargetCluster>,
}

impl Inventory {
    /// Every (target, node) pair, targets in configured order.
    pub fn target_nodes(&self) -> Vec<NodeRef> {
        self.targets.iter().flat_map(TargetCluster::nodes).collect()
    }

    pub fn target_node_count(&self) -> usize {
        self.targets.iter().map(|t| t.node_names.len()).sum()
    }
}
