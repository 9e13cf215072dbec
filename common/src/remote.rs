//! Running shell scripts on cluster nodes.

use async_trait::async_trait;

use crate::error::Result;

/// What a remote script left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// What the script printed. The debug transport also forwards the
    /// script's own stderr here.
    pub stdout: String,
    /// Diagnostics of the transport itself, such as admission warnings. Never
    /// parsed, only reported.
    pub stderr: String,
}

impl ScriptOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: i32, stdout: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Both streams, trimmed, for error messages.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();

        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Runs a script in the host namespace of a node.
///
/// `Err` means the node could not be reached at all (the transport failed to
/// start, or the deadline passed). A script that ran and exited non-zero is an
/// `Ok` with a failed [`ScriptOutput`]; deciding what that means is up to the
/// caller. Nothing is retried.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run(&self, context: &str, node: &str, script: &str) -> Result<ScriptOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_non_empty_streams() {
        assert_eq!(ScriptOutput::success("out\n").combined(), "out");
        assert_eq!(
            ScriptOutput::failure(1, "").with_stderr("error: no node\n").combined(),
            "error: no node"
        );
        assert_eq!(
            ScriptOutput::failure(1, "out\n").with_stderr("err\n").combined(),
            "out\nerr"
        );
    }
}
