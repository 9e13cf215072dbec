use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use blackhole_common::cluster::{NodeAddress, NodeInfo, RouteInfo};
use blackhole_common::cluster_api::{ClusterApi, ClusterConnector};
use blackhole_common::{BlackholeError, Result};
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, DynamicObject, GroupVersionKind, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use kube::{Client, ResourceExt};
use serde_json::Value;
use tracing::debug;

const ROUTE_GROUP: &str = "route.openshift.io";
const ROUTE_VERSION: &str = "v1";
const ROUTE_KIND: &str = "Route";

/// Opens one API client per context of a single, possibly merged, kubeconfig.
#[derive(Clone)]
pub struct KubeConnector {
    kubeconfig: Arc<Kubeconfig>,
}

impl KubeConnector {
    pub fn new(kubeconfig: Kubeconfig) -> Self {
        Self {
            kubeconfig: Arc::new(kubeconfig),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|err| {
            BlackholeError::Config(format!("cannot read kubeconfig {}: {err}", path.display()))
        })?;

        Ok(Self::new(kubeconfig))
    }

    /// Uses `path` when given, else merges every file in `$KUBECONFIG` or
    /// falls back to `~/.kube/config`, like `kubectl` and `oc` do.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Kubeconfig::read()
                .map(Self::new)
                .map_err(|err| BlackholeError::Config(format!("cannot read kubeconfig: {err}"))),
        }
    }
}

#[async_trait]
impl ClusterConnector for KubeConnector {
    async fn connect(&self, context: &str) -> Result<Arc<dyn ClusterApi>> {
        debug!("Connecting to cluster {context:?}");

        let options = KubeConfigOptions {
            context: Some(context.to_string()),
            ..Default::default()
        };

        let config = kube::Config::from_custom_kubeconfig((*self.kubeconfig).clone(), &options)
            .await
            .map_err(|err| BlackholeError::Config(format!("context {context:?}: {err}")))?;

        let client = Client::try_from(config)
            .map_err(|err| BlackholeError::Config(format!("context {context:?}: {err}")))?;

        Ok(Arc::new(KubeClusterApi {
            context: context.to_string(),
            client,
            kubeconfig: Arc::clone(&self.kubeconfig),
        }))
    }
}

pub struct KubeClusterApi {
    context: String,
    client: Client,
    kubeconfig: Arc<Kubeconfig>,
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    fn context(&self) -> &str {
        &self.context
    }

    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api
            .list(&ListParams::default())
            .await
            .map_err(|err| {
                BlackholeError::discovery(&self.context, format!("cannot list nodes: {err}"))
            })?;

        Ok(nodes.items.into_iter().map(node_info).collect())
    }

    async fn list_routes(&self) -> Result<Vec<RouteInfo>> {
        let resource = ApiResource::from_gvk(&GroupVersionKind::gvk(
            ROUTE_GROUP,
            ROUTE_VERSION,
            ROUTE_KIND,
        ));
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &resource);

        match api.list(&ListParams::default()).await {
            Ok(routes) => Ok(routes.items.iter().map(route_info).collect()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                debug!("cluster {:?} does not serve {ROUTE_GROUP}/{ROUTE_VERSION}", self.context);
                Ok(Vec::new())
            }
            Err(err) => Err(BlackholeError::discovery(
                &self.context,
                format!("cannot list routes: {err}"),
            )),
        }
    }

    fn server_url(&self) -> Result<String> {
        server_url(&self.kubeconfig, &self.context)
    }
}

/// Server URL of the cluster a kubeconfig context points at.
pub fn server_url(kubeconfig: &Kubeconfig, context: &str) -> Result<String> {
    let cluster = kubeconfig
        .contexts
        .iter()
        .find(|named| named.name == context)
        .and_then(|named| named.context.as_ref())
        .map(|ctx| ctx.cluster.as_str())
        .ok_or_else(|| BlackholeError::discovery(context, "no cluster for context"))?;

    kubeconfig
        .clusters
        .iter()
        .find(|named| named.name == cluster)
        .and_then(|named| named.cluster.as_ref())
        .and_then(|cluster| cluster.server.clone())
        .ok_or_else(|| {
            BlackholeError::discovery(context, format!("cluster {cluster:?} has no server URL"))
        })
}

fn node_info(node: Node) -> NodeInfo {
    let name = node.name_any();
    let addresses = node
        .status
        .and_then(|status| status.addresses)
        .unwrap_or_default()
        .into_iter()
        .map(|addr| NodeAddress::new(addr.type_, addr.address))
        .collect();

    NodeInfo::new(name, addresses)
}

/// Hosts come from `status.ingress[].host`; a route not admitted yet has none.
fn route_info(route: &DynamicObject) -> RouteInfo {
    let hosts = route
        .data
        .pointer("/status/ingress")
        .and_then(Value::as_array)
        .map(|ingress| {
            ingress
                .iter()
                .filter_map(|entry| entry.get("host").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    RouteInfo {
        namespace: route.namespace().unwrap_or_default(),
        name: route.name_any(),
        hosts,
    }
}
