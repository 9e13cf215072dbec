//! # Status Aggregation
//!
//! Turns the live blackhole routes of every target node into a
//! [`ClusterStatus`] per target.

use std::collections::BTreeMap;

use blackhole_common::cluster::{BlackholeStatus, ClusterStatus, NodeRef};
use blackhole_common::network::AddressSet;

/// Compares the live routes of one node against the blocked cluster addresses.
pub fn classify(live: &AddressSet, expected: &AddressSet) -> BlackholeStatus {
    if live.contains_all(expected) {
        BlackholeStatus::Blocked
    } else if live.contains_any(expected) {
        BlackholeStatus::PartlyBlocked
    } else {
        BlackholeStatus::Unblocked
    }
}

/// Collects node results keyed by `(target, node)`, whatever order they
/// arrive in.
pub struct StatusAggregator<'a> {
    expected: &'a AddressSet,
    targets: BTreeMap<String, TargetState>,
}

#[derive(Default)]
struct TargetState {
    status: ClusterStatus,
    first_seen: Option<BlackholeStatus>,
}

impl<'a> StatusAggregator<'a> {
    /// Every target context listed here appears in the result, even if no
    /// node of it is ever recorded.
    pub fn new<I, S>(expected: &'a AddressSet, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected,
            targets: targets
                .into_iter()
                .map(|context| (context.into(), TargetState::default()))
                .collect(),
        }
    }

    pub fn record(&mut self, node: &NodeRef, live: &AddressSet) -> BlackholeStatus {
        let status = classify(live, self.expected);
        let target = self.targets.entry(node.context.clone()).or_default();

        if status == BlackholeStatus::PartlyBlocked {
            target.status.valid = false;
        }

        match target.first_seen {
            None => target.first_seen = Some(status),
            Some(first) if first != status => target.status.valid = false,
            Some(_) => {}
        }

        target.status.nodes.insert(node.node.clone(), status);
        status
    }

    pub fn finish(self) -> BTreeMap<String, ClusterStatus> {
        self.targets
            .into_iter()
            .map(|(context, state)| (context, state.status))
            .collect()
    }
}
