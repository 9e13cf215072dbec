use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::NodeRef;
use crate::error::BlackholeError;

/// How much of the blocked cluster a single node drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlackholeStatus {
    /// None of the cluster addresses are blackholed.
    Unblocked,
    /// All cluster addresses are blackholed.
    Blocked,
    /// Some, but not all, cluster addresses are blackholed.
    PartlyBlocked,
}

impl BlackholeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlackholeStatus::Unblocked => "unblocked",
            BlackholeStatus::Blocked => "blocked",
            BlackholeStatus::PartlyBlocked => "partly-blocked",
        }
    }
}

impl fmt::Display for BlackholeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition state of one target cluster.
///
/// `valid` is true only when every node reports the same status and that
/// status is not [`BlackholeStatus::PartlyBlocked`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterStatus {
    pub valid: bool,
    pub nodes: BTreeMap<String, BlackholeStatus>,
}

impl Default for ClusterStatus {
    fn default() -> Self {
        Self {
            valid: true,
            nodes: BTreeMap::new(),
        }
    }
}

/// The document `show` prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub cluster: String,
    pub targets: BTreeMap<String, ClusterStatus>,
}

/// Outcome of one (target, node) task, alive only while a phase aggregates.
#[derive(Debug)]
pub struct NodeOperationResult<T> {
    pub node: NodeRef,
    pub outcome: Result<T, BlackholeError>,
}

impl<T> NodeOperationResult<T> {
    pub fn new(node: NodeRef, outcome: Result<T, BlackholeError>) -> Self {
        Self { node, outcome }
    }
}
