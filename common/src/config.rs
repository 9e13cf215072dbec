use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BlackholeError, Result};

/// Image used for the debug pod. Only a working `chroot` is needed, and this
/// busybox build is tiny.
pub const DEFAULT_DEBUG_IMAGE: &str = "quay.io/nirsof/busybox:stable-musl";

/// Client binary that provides `debug node/<name>`.
pub const DEFAULT_DEBUG_PROGRAM: &str = "oc";

/// Everything one invocation needs, passed explicitly into constructors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Kubeconfig holding every context named below. `None` follows the
    /// client lookup: every file in `$KUBECONFIG`, else `~/.kube/config`.
    pub kubeconfig: Option<PathBuf>,
    /// Context of the cluster to make unreachable.
    pub blocked_context: String,
    /// Contexts of the clusters that lose access, in the order given.
    pub target_contexts: Vec<String>,
    pub exec: ExecConfig,
}

/// How node scripts are run.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    pub program: String,
    pub image: String,
    /// Deadline for a single remote script. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_DEBUG_PROGRAM.to_string(),
            image: DEFAULT_DEBUG_IMAGE.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn new(
        kubeconfig: Option<PathBuf>,
        blocked_context: impl Into<String>,
        target_contexts: Vec<String>,
    ) -> Self {
        Self {
            kubeconfig,
            blocked_context: blocked_context.into(),
            target_contexts,
            exec: ExecConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_contexts(&self.blocked_context, &self.target_contexts)
    }
}

/// Rejects a blocked context that is also a target, and repeated targets.
pub fn validate_contexts(blocked_context: &str, target_contexts: &[String]) -> Result<()> {
    if target_contexts.is_empty() {
        return Err(BlackholeError::Config(String::from(
            "no target contexts given",
        )));
    }

    let unique: HashSet<&str> = target_contexts.iter().map(String::as_str).collect();

    if unique.len() != target_contexts.len() {
        return Err(BlackholeError::Config(format!(
            "duplicate contexts: {target_contexts:?}"
        )));
    }

    if unique.contains(blocked_context) {
        return Err(BlackholeError::Config(format!(
            "blocked cluster {blocked_context:?} in target clusters {target_contexts:?}"
        )));
    }

    Ok(())
}
