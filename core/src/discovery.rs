//! # Blocked Cluster Discovery
//!
//! Finds every address through which the blocked cluster can be reached:
//!
//! 1. the external IP of each node,
//! 2. every record of the API server hostname,
//! 3. every record of each admitted ingress route host.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use blackhole_common::cluster::BlockedCluster;
use blackhole_common::cluster_api::ClusterApi;
use blackhole_common::network::AddressSet;
use blackhole_common::resolver::Resolver;
use blackhole_common::{BlackholeError, Result};
use tracing::debug;

/// Derives the address set of the blocked cluster.
///
/// Only reads from the cluster and DNS, never changes anything.
#[derive(Clone)]
pub struct AddressDiscovery {
    api: Arc<dyn ClusterApi>,
    resolver: Arc<dyn Resolver>,
}

impl AddressDiscovery {
    pub fn new(api: Arc<dyn ClusterApi>, resolver: Arc<dyn Resolver>) -> Self {
        Self { api, resolver }
    }

    pub fn context(&self) -> &str {
        self.api.context()
    }

    /// Runs the three lookups and returns the populated, immutable cluster.
    pub async fn inspect(&self) -> Result<BlockedCluster> {
        let node_addresses = self.node_addresses().await?;
        debug!("blocked nodes addresses: {node_addresses}");

        let api_server_addresses = self.api_server_addresses().await?;
        debug!("blocked API server addresses: {api_server_addresses}");

        let route_addresses = self.route_addresses().await?;
        debug!("blocked routes addresses: {route_addresses}");

        Ok(BlockedCluster::new(
            self.context(),
            node_addresses,
            api_server_addresses,
            route_addresses,
        ))
    }

    /// External IP of every node. Every node must have one.
    pub async fn node_addresses(&self) -> Result<AddressSet> {
        let context = self.context();
        let mut addresses = AddressSet::new();

        for node in self.api.list_nodes().await? {
            let address = node.external_ip().ok_or_else(|| {
                BlackholeError::discovery(
                    context,
                    format!("could not find external IP address for node {}", node.name),
                )
            })?;

            debug!("found blocked cluster node {} address {address}", node.name);
            addresses.insert(address);
        }

        if addresses.is_empty() {
            return Err(BlackholeError::discovery(
                context,
                "could not find any blocked cluster node addresses",
            ));
        }

        Ok(addresses)
    }

    /// Every address the configured API server host resolves to.
    pub async fn api_server_addresses(&self) -> Result<AddressSet> {
        let context = self.context();
        let server = self.api.server_url()?;

        let host = server_host(&server).ok_or_else(|| {
            BlackholeError::discovery(
                context,
                format!("cannot parse cluster server URL {server:?}"),
            )
        })?;

        self.resolve(&host).await
    }

    /// Addresses behind ingress routes. Routes still waiting for a host are
    /// skipped.
    pub async fn route_addresses(&self) -> Result<AddressSet> {
        let mut hosts: BTreeSet<String> = BTreeSet::new();

        for route in self.api.list_routes().await? {
            let assigned: Vec<&str> = route
                .hosts
                .iter()
                .map(|host| host.trim())
                .filter(|host| !host.is_empty())
                .collect();

            if assigned.is_empty() {
                debug!("route {}/{} has no host yet", route.namespace, route.name);
                continue;
            }

            hosts.extend(assigned.into_iter().map(str::to_string));
        }

        let mut addresses = AddressSet::new();
        for host in &hosts {
            addresses = addresses.union(&self.resolve(host).await?);
        }

        Ok(addresses)
    }

    async fn resolve(&self, host: &str) -> Result<AddressSet> {
        if host.parse::<IpAddr>().is_ok() {
            return Ok([host].into_iter().collect());
        }

        let records = self.resolver.lookup(host).await.map_err(|err| {
            BlackholeError::discovery(self.context(), format!("cannot resolve {host:?}: {err}"))
        })?;

        let addresses: AddressSet = records.into_iter().collect();
        if addresses.is_empty() {
            return Err(BlackholeError::discovery(
                self.context(),
                format!("no address records for {host:?}"),
            ));
        }

        Ok(addresses)
    }
}

/// Host part of a cluster server URL, without IPv6 brackets.
///
/// `https://api.perf2.example.com:6443` gives `api.perf2.example.com`.
pub fn server_host(server: &str) -> Option<String> {
    let uri: http::Uri = server.trim().parse().ok()?;
    let host = uri.host()?.trim_start_matches('[').trim_end_matches(']');

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
