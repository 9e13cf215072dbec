use std::sync::Arc;

use blackhole_common::cluster::TargetCluster;
use blackhole_common::cluster_api::ClusterApi;
use blackhole_common::{BlackholeError, Result};
use tracing::debug;

/// Lists the nodes of a target cluster.
#[derive(Clone)]
pub struct ClusterInspector {
    api: Arc<dyn ClusterApi>,
}

impl ClusterInspector {
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        Self { api }
    }

    pub fn context(&self) -> &str {
        self.api.context()
    }

    /// Node names in API order. A cluster without nodes is an error, there
    /// would be nothing to block.
    pub async fn inspect(&self) -> Result<TargetCluster> {
        let node_names: Vec<String> = self
            .api
            .list_nodes()
            .await?
            .into_iter()
            .map(|node| node.name)
            .collect();

        if node_names.is_empty() {
            return Err(BlackholeError::discovery(
                self.context(),
                "could not find any target cluster node",
            ));
        }

        debug!("found target cluster {:?} nodes {node_names:?}", self.context());
        Ok(TargetCluster::new(self.context(), node_names))
    }
}
