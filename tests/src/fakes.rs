#![cfg(test)]
//! In-memory clusters, DNS and node route tables.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blackhole_common::cluster::node::EXTERNAL_IP;
use blackhole_common::cluster::{NodeAddress, NodeInfo, RouteInfo};
use blackhole_common::cluster_api::{ClusterApi, ClusterConnector};
use blackhole_common::remote::{RemoteExecutor, ScriptOutput};
use blackhole_common::resolver::Resolver;
use blackhole_common::{BlackholeError, Result};
use blackhole_protocols::iproute::BLACKHOLE;

#[derive(Debug, Clone)]
pub struct FakeCluster {
    context: String,
    server: String,
    nodes: Vec<NodeInfo>,
    routes: Vec<RouteInfo>,
}

impl FakeCluster {
    pub fn new(context: &str, server: &str) -> Self {
        Self {
            context: context.to_string(),
            server: server.to_string(),
            nodes: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn node(mut self, name: &str, external_ip: Option<&str>) -> Self {
        let mut addresses = vec![NodeAddress::new("Hostname", name)];
        if let Some(ip) = external_ip {
            addresses.push(NodeAddress::new(EXTERNAL_IP, ip));
        }
        self.nodes.push(NodeInfo::new(name, addresses));
        self
    }

    pub fn route(mut self, name: &str, host: &str) -> Self {
        self.routes.push(RouteInfo {
            namespace: "default".to_string(),
            name: name.to_string(),
            hosts: vec![host.to_string()],
        });
        self
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    fn context(&self) -> &str {
        &self.context
    }

    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        Ok(self.nodes.clone())
    }

    async fn list_routes(&self) -> Result<Vec<RouteInfo>> {
        Ok(self.routes.clone())
    }

    fn server_url(&self) -> Result<String> {
        Ok(self.server.clone())
    }
}

type NodeKey = (String, String);

/// Clusters, DNS records and the live blackhole table of every node.
#[derive(Default)]
pub struct FakeWorld {
    clusters: HashMap<String, FakeCluster>,
    dns: HashMap<String, Vec<String>>,
    tables: Mutex<HashMap<NodeKey, BTreeSet<String>>>,
    unreachable: HashSet<NodeKey>,
    scripts: Mutex<Vec<(NodeKey, String)>>,
    connects: Mutex<Vec<String>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster(mut self, cluster: FakeCluster) -> Self {
        self.clusters.insert(cluster.context.clone(), cluster);
        self
    }

    pub fn dns(mut self, host: &str, addresses: &[&str]) -> Self {
        self.dns
            .insert(host.to_string(), addresses.iter().map(|a| a.to_string()).collect());
        self
    }

    /// Installs blackholes on a node before the scenario starts.
    pub fn blackholes(self, context: &str, node: &str, addresses: &[&str]) -> Self {
        self.lock_tables()
            .entry(key(context, node))
            .or_default()
            .extend(addresses.iter().map(|a| a.to_string()));
        self
    }

    /// Every script sent to this node fails to reach it.
    pub fn unreachable(mut self, context: &str, node: &str) -> Self {
        self.unreachable.insert(key(context, node));
        self
    }

    pub fn table(&self, context: &str, node: &str) -> Vec<String> {
        self.lock_tables()
            .get(&key(context, node))
            .map(|routes| routes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, script)| script.clone())
            .collect()
    }

    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().unwrap().clone()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<NodeKey, BTreeSet<String>>> {
        self.tables.lock().unwrap()
    }

    /// Runs a script the way `sh` on the node would, stopping at the first
    /// failing line.
    fn apply(&self, node: &NodeKey, script: &str) -> ScriptOutput {
        let mut tables = self.lock_tables();
        let table = tables.entry(node.clone()).or_default();
        let mut output = String::new();

        for line in script.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["ip", "route", "replace", BLACKHOLE, address] => {
                    table.insert(address.to_string());
                }
                ["ip", "route", "del", BLACKHOLE, address] => {
                    if !table.remove(*address) {
                        output.push_str("RTNETLINK answers: No such process\n");
                        return ScriptOutput::failure(2, output);
                    }
                }
                ["ip", "-4", "route", "show", "type", BLACKHOLE] => {
                    for address in table.iter().filter(|a| !a.contains(':')) {
                        output.push_str(&format!("{BLACKHOLE} {address} \n"));
                    }
                }
                ["ip", "-6", "route", "show", "type", BLACKHOLE] => {
                    for address in table.iter().filter(|a| a.contains(':')) {
                        output.push_str(&format!(
                            "{BLACKHOLE} {address} dev lo metric 1024 pref medium\n"
                        ));
                    }
                }
                _ => {
                    output.push_str(&format!("sh: {line}: not found\n"));
                    return ScriptOutput::failure(127, output);
                }
            }
        }

        ScriptOutput::success(output)
    }
}

fn key(context: &str, node: &str) -> NodeKey {
    (context.to_string(), node.to_string())
}

/// Shares one world between every collaborator trait.
#[derive(Clone)]
pub struct Shared(pub Arc<FakeWorld>);

#[async_trait]
impl ClusterConnector for Shared {
    async fn connect(&self, context: &str) -> Result<Arc<dyn ClusterApi>> {
        self.0.connects.lock().unwrap().push(context.to_string());

        let cluster = self
            .0
            .clusters
            .get(context)
            .cloned()
            .ok_or_else(|| BlackholeError::Config(format!("context {context:?} not found")))?;

        Ok(Arc::new(cluster))
    }
}

#[async_trait]
impl Resolver for Shared {
    async fn lookup(&self, host: &str) -> io::Result<Vec<String>> {
        self.0
            .dns
            .get(host)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{host}: NXDOMAIN")))
    }
}

#[async_trait]
impl RemoteExecutor for Shared {
    async fn run(&self, context: &str, node: &str, script: &str) -> Result<ScriptOutput> {
        let node_key = key(context, node);

        if self.0.unreachable.contains(&node_key) {
            return Err(BlackholeError::remote_exec(
                context,
                node,
                "error: unable to create the debug pod",
            ));
        }

        self.0
            .scripts
            .lock()
            .unwrap()
            .push((node_key.clone(), script.to_string()));

        Ok(self.0.apply(&node_key, script))
    }
}
