//! The Kubernetes API as discovery sees it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cluster::{NodeInfo, RouteInfo};
use crate::error::Result;

/// Read-only view of one cluster, bound to a single context.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Context this client talks to.
    fn context(&self) -> &str;

    async fn list_nodes(&self) -> Result<Vec<NodeInfo>>;

    /// Ingress routes in every namespace.
    async fn list_routes(&self) -> Result<Vec<RouteInfo>>;

    /// API server URL configured for the context, e.g. `https://api.perf2.example.com:6443`.
    fn server_url(&self) -> Result<String>;
}

/// Builds a [`ClusterApi`] for a context of the loaded configuration.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    async fn connect(&self, context: &str) -> Result<Arc<dyn ClusterApi>>;
}
