use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use blackhole_common::config::ExecConfig;
use blackhole_common::remote::{RemoteExecutor, ScriptOutput};
use blackhole_common::{BlackholeError, Result};
use tokio::process::Command;
use tracing::debug;

/// Runs scripts in the host namespace of a node through a debug pod.
///
/// Stderr of the script ends up on stdout of `oc debug`; stderr of `oc`
/// itself only carries client diagnostics and is kept apart.
#[derive(Debug, Clone)]
pub struct DebugNodeExecutor {
    /// `None` leaves the lookup to the client: `$KUBECONFIG`, then
    /// `~/.kube/config`.
    kubeconfig: Option<PathBuf>,
    exec: ExecConfig,
}

impl DebugNodeExecutor {
    pub fn new(kubeconfig: Option<PathBuf>, exec: ExecConfig) -> Self {
        Self { kubeconfig, exec }
    }

    fn command(&self, context: &str, node: &str, script: &str) -> Command {
        let mut cmd = Command::new(&self.exec.program);
        cmd.arg("debug")
            .arg(format!("node/{node}"))
            .arg("--quiet")
            .arg(format!("--image={}", self.exec.image))
            .arg(format!("--context={context}"));

        if let Some(path) = &self.kubeconfig {
            cmd.arg(format!("--kubeconfig={}", path.display()));
        }

        cmd.args(["--", "chroot", "/host", "sh", "-c", script])
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl RemoteExecutor for DebugNodeExecutor {
    async fn run(&self, context: &str, node: &str, script: &str) -> Result<ScriptOutput> {
        let mut cmd = self.command(context, node, script);
        debug!("Running command on node {node}: {:?}", cmd.as_std());

        let output = match self.exec.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    BlackholeError::remote_exec(context, node, format!("timed out after {limit:?}"))
                })?,
            None => cmd.output().await,
        }
        .map_err(|err| {
            BlackholeError::remote_exec(
                context,
                node,
                format!("cannot run {}: {err}", self.exec.program),
            )
        })?;

        Ok(ScriptOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
