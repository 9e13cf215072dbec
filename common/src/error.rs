use thiserror::Error;

pub type Result<T, E = BlackholeError> = std::result::Result<T, E>;

/// Every way a block, unblock or show command can fail.
#[derive(Debug, Error)]
pub enum BlackholeError {
    /// Bad command line or kubeconfig input. Raised before any cluster is touched.
    #[error("{0}")]
    Config(String),

    /// A node, API server or DNS lookup failed or came back empty.
    #[error("cluster {context:?}: {reason}")]
    Discovery { context: String, reason: String },

    /// The route mutation script exited with a non-zero status.
    #[error("applying routes on cluster {context:?} node {node:?} failed ({}): {output}", exit_label(.status))]
    RouteApply {
        context: String,
        node: String,
        status: Option<i32>,
        output: String,
    },

    /// A route table line did not look like `blackhole <address> ...`.
    #[error("invalid route {line:?} on cluster {context:?} node {node:?}")]
    Parse {
        context: String,
        node: String,
        line: String,
    },

    /// The node could not be reached, or the remote query itself failed.
    #[error("remote command on cluster {context:?} node {node:?} failed: {reason}")]
    RemoteExec {
        context: String,
        node: String,
        reason: String,
    },

    /// A scheduled task panicked before reporting a result.
    #[error("task failed: {0}")]
    Task(String),

    /// More than one node task failed in the same phase.
    #[error("{}", summarize(.0))]
    NodeFailures(Vec<BlackholeError>),
}

impl BlackholeError {
    pub fn discovery(context: &str, reason: impl Into<String>) -> Self {
        Self::Discovery {
            context: context.to_string(),
            reason: reason.into(),
        }
    }

    pub fn remote_exec(context: &str, node: &str, reason: impl Into<String>) -> Self {
        Self::RemoteExec {
            context: context.to_string(),
            node: node.to_string(),
            reason: reason.into(),
        }
    }

    /// Folds the failures of one phase into a single error.
    ///
    /// Returns `None` when nothing failed, the failure itself when exactly one
    /// node failed, and [`BlackholeError::NodeFailures`] otherwise. Failures keep
    /// the order they were observed in.
    pub fn collect(mut failures: Vec<BlackholeError>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::NodeFailures(failures)),
        }
    }
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => String::from("terminated by signal"),
    }
}

fn summarize(failures: &[BlackholeError]) -> String {
    match failures.first() {
        Some(first) => format!("{} node operations failed, first: {first}", failures.len()),
        None => String::from("no node operation failed"),
    }
}
