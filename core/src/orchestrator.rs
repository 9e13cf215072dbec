//! # Orchestrator
//!
//! Drives the phases of one command against every cluster involved:
//!
//! 1. **Inspect**: the blocked cluster and every target cluster concurrently.
//! 2. **Block / Unblock**: one route mutation task per target node.
//! 3. **Status**: one route query task per target node, classified afterwards.
//!
//! Every phase waits for all of its tasks, failed or not, before returning.
//! Nothing is cancelled and nothing is retried.

use std::future::Future;
use std::sync::Arc;

use blackhole_common::cluster::{
    BlockedCluster, Inventory, NodeOperationResult, NodeRef, StatusReport, TargetCluster,
};
use blackhole_common::cluster_api::ClusterConnector;
use blackhole_common::config::{Config, validate_contexts};
use blackhole_common::progress::ProgressSink;
use blackhole_common::remote::RemoteExecutor;
use blackhole_common::resolver::Resolver;
use blackhole_common::{BlackholeError, Result};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use crate::discovery::AddressDiscovery;
use crate::inspector::ClusterInspector;
use crate::routes::RemoteRouteAgent;
use crate::status::StatusAggregator;

pub struct Orchestrator {
    blocked: AddressDiscovery,
    targets: Vec<ClusterInspector>,
    agent: RemoteRouteAgent,
    progress: Arc<dyn ProgressSink>,
}

enum Inspected {
    Blocked(BlockedCluster),
    Target(usize, TargetCluster),
}

/// Clears the progress display when a phase ends, however it ends.
struct Phase<'a> {
    progress: &'a dyn ProgressSink,
}

impl Drop for Phase<'_> {
    fn drop(&mut self) {
        self.progress.clear();
    }
}

impl Orchestrator {
    /// Fails with [`BlackholeError::Config`] when the blocked context is also
    /// a target, or a target repeats.
    pub fn new(
        blocked: AddressDiscovery,
        targets: Vec<ClusterInspector>,
        agent: RemoteRouteAgent,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Self> {
        let contexts: Vec<String> = targets.iter().map(|t| t.context().to_string()).collect();
        validate_contexts(blocked.context(), &contexts)?;

        Ok(Self {
            blocked,
            targets,
            agent,
            progress,
        })
    }

    /// Validates `config`, then opens one API connection per context.
    pub async fn connect(
        config: &Config,
        connector: &dyn ClusterConnector,
        resolver: Arc<dyn Resolver>,
        executor: Arc<dyn RemoteExecutor>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Self> {
        config.validate()?;

        let blocked = AddressDiscovery::new(
            connector.connect(&config.blocked_context).await?,
            resolver,
        );

        let mut targets = Vec::with_capacity(config.target_contexts.len());
        for context in &config.target_contexts {
            targets.push(ClusterInspector::new(connector.connect(context).await?));
        }

        Self::new(blocked, targets, RemoteRouteAgent::new(executor), progress)
    }

    pub fn blocked_context(&self) -> &str {
        self.blocked.context()
    }

    /// Inspects the blocked cluster and every target cluster concurrently.
    ///
    /// All inspections run to completion; the first error observed is returned.
    pub async fn inspect_all(&self) -> Result<Inventory> {
        let _phase = self.phase("inspecting clusters", self.targets.len() + 1);
        let mut tasks = JoinSet::new();

        let discovery = self.blocked.clone();
        let progress = Arc::clone(&self.progress);
        tasks.spawn(async move {
            debug!("Inspecting cluster {:?}", discovery.context());
            let inspected = discovery.inspect().await.map(Inspected::Blocked);
            progress.task_done();
            inspected
        });

        for (index, inspector) in self.targets.iter().cloned().enumerate() {
            let progress = Arc::clone(&self.progress);
            tasks.spawn(async move {
                debug!("Inspecting target {:?}", inspector.context());
                let inspected = inspector
                    .inspect()
                    .await
                    .map(|target| Inspected::Target(index, target));
                progress.task_done();
                inspected
            });
        }

        let mut blocked = None;
        let mut targets: Vec<Option<TargetCluster>> = vec![None; self.targets.len()];
        let mut first_error: Option<BlackholeError> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(task_failure).and_then(|inspected| inspected) {
                Ok(Inspected::Blocked(cluster)) => blocked = Some(cluster),
                Ok(Inspected::Target(index, target)) => targets[index] = Some(target),
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => error!("{err}"),
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let blocked = blocked.ok_or_else(|| {
            BlackholeError::Task(String::from("blocked cluster was not inspected"))
        })?;
        let targets = targets
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| BlackholeError::Task(String::from("target cluster was not inspected")))?;

        Ok(Inventory { blocked, targets })
    }

    /// Installs a blackhole route for every blocked address on every target node.
    pub async fn block(&self, inventory: &Inventory) -> Result<()> {
        let nodes = inventory.target_nodes();
        let _phase = self.phase("modifying nodes", nodes.len());

        let addresses = Arc::new(inventory.blocked.all_addresses().to_vec());
        info!(
            "Blocking cluster {:?} ({} addresses) in {} nodes",
            inventory.blocked.context,
            addresses.len(),
            nodes.len()
        );

        let agent = self.agent.clone();
        let blocked = inventory.blocked.context.clone();
        let results = self
            .run_on_nodes(nodes, move |node| {
                let agent = agent.clone();
                let addresses = Arc::clone(&addresses);
                let blocked = blocked.clone();
                async move {
                    agent
                        .add_routes(&node.context, &node.node, &addresses)
                        .await
                        .inspect(|_| debug!("Cluster {blocked:?} blocked in node {node}"))
                }
            })
            .await?;

        failures_of(results)
    }

    /// Removes the blackhole routes of the blocked addresses from every target
    /// node. Unrelated blackholes stay.
    pub async fn unblock(&self, inventory: &Inventory) -> Result<()> {
        let nodes = inventory.target_nodes();
        let _phase = self.phase("modifying nodes", nodes.len());

        let addresses = Arc::new(inventory.blocked.all_addresses().to_vec());
        info!(
            "Unblocking cluster {:?} in {} nodes",
            inventory.blocked.context,
            nodes.len()
        );

        let agent = self.agent.clone();
        let blocked = inventory.blocked.context.clone();
        let results = self
            .run_on_nodes(nodes, move |node| {
                let agent = agent.clone();
                let addresses = Arc::clone(&addresses);
                let blocked = blocked.clone();
                async move {
                    agent
                        .remove_routes(&node.context, &node.node, &addresses)
                        .await
                        .inspect(|_| debug!("Cluster {blocked:?} unblocked in node {node}"))
                }
            })
            .await?;

        failures_of(results)
    }

    /// Queries every target node and classifies it against the blocked
    /// addresses. Any query failure replaces the report.
    pub async fn status(&self, inventory: &Inventory) -> Result<StatusReport> {
        let nodes = inventory.target_nodes();
        let _phase = self.phase("inspecting nodes", nodes.len());

        let agent = self.agent.clone();
        let results = self
            .run_on_nodes(nodes, move |node| {
                let agent = agent.clone();
                async move { agent.query_routes(&node.context, &node.node).await }
            })
            .await?;

        let expected = inventory.blocked.all_addresses();
        let mut aggregator = StatusAggregator::new(
            &expected,
            inventory.targets.iter().map(|target| target.context.as_str()),
        );
        let mut failures = Vec::new();

        for result in results {
            match result.outcome {
                Ok(live) => {
                    let status = aggregator.record(&result.node, &live);
                    debug!("node {} is {status}", result.node);
                }
                Err(err) => {
                    error!("{err}");
                    failures.push(err);
                }
            }
        }

        if let Some(err) = BlackholeError::collect(failures) {
            return Err(err);
        }

        Ok(StatusReport {
            cluster: inventory.blocked.context.clone(),
            targets: aggregator.finish(),
        })
    }

    fn phase(&self, description: &str, tasks: usize) -> Phase<'_> {
        self.progress.set_description(description);
        self.progress.set_tasks(tasks as u64);
        Phase {
            progress: self.progress.as_ref(),
        }
    }

    /// Runs `op` once per node, each in its own task.
    ///
    /// Results arrive over a channel sized to the task count, so no sender
    /// ever waits. Returns once the channel is closed and every task joined.
    /// A panicking `op` becomes a [`BlackholeError::Task`] for its node.
    async fn run_on_nodes<T, F, Fut>(
        &self,
        nodes: Vec<NodeRef>,
        op: F,
    ) -> Result<Vec<NodeOperationResult<T>>>
    where
        T: Send + 'static,
        F: Fn(NodeRef) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel(nodes.len().max(1));
        let mut tasks = JoinSet::new();

        for node in nodes {
            let tx = tx.clone();
            let progress = Arc::clone(&self.progress);
            let work = tokio::spawn(op(node.clone()));

            tasks.spawn(async move {
                let outcome = match work.await {
                    Ok(outcome) => outcome,
                    Err(err) => Err(BlackholeError::Task(format!("{node}: {err}"))),
                };
                progress.task_done();
                let _ = tx.send(NodeOperationResult::new(node, outcome)).await;
            });
        }
        drop(tx);

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        let mut lost = None;
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                lost.get_or_insert(task_failure(err));
            }
        }

        match lost {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }
}

fn task_failure(err: JoinError) -> BlackholeError {
    BlackholeError::Task(err.to_string())
}

/// Logs every failed node and folds the failures into one error.
fn failures_of(results: Vec<NodeOperationResult<()>>) -> Result<()> {
    let failures: Vec<BlackholeError> = results
        .into_iter()
        .filter_map(|result| result.outcome.err())
        .inspect(|err| error!("{err}"))
        .collect();

    match BlackholeError::collect(failures) {
        Some(err) => Err(err),
        None => Ok(()),
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
