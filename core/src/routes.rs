//! # Remote Route Agent
//!
//! Applies the [`iproute`] protocol to one node through a [`RemoteExecutor`].
//! Each call sends at most one mutation script, so a node is either fully
//! updated or reports the failure of that single script.

use std::sync::Arc;

use blackhole_common::network::AddressSet;
use blackhole_common::remote::{RemoteExecutor, ScriptOutput};
use blackhole_common::{BlackholeError, Result};
use blackhole_protocols::iproute;
use tracing::debug;

#[derive(Clone)]
pub struct RemoteRouteAgent {
    executor: Arc<dyn RemoteExecutor>,
}

impl RemoteRouteAgent {
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self {
        Self { executor }
    }

    /// Installs a blackhole route for every address, in the given order.
    ///
    /// `replace` is idempotent, no need to check for existing blackholes.
    pub async fn add_routes(&self, context: &str, node: &str, addresses: &[String]) -> Result<()> {
        debug!("blocking addresses in node {node}");

        if addresses.is_empty() {
            debug!("No address to block on node {node}");
            return Ok(());
        }

        let script = iproute::replace_script(addresses);
        let output = self.executor.run(context, node, &script).await?;
        ensure_applied(context, node, output)
    }

    /// Removes the blackhole routes of `addresses` that are currently installed.
    ///
    /// `ip route del` is not idempotent, so the live table is queried first and
    /// the remote call is skipped when nothing matches.
    pub async fn remove_routes(
        &self,
        context: &str,
        node: &str,
        addresses: &[String],
    ) -> Result<()> {
        debug!("unblocking addresses in node {node}");

        let present = self.query_routes(context, node).await?;

        let Some(script) = iproute::delete_script(addresses, &present) else {
            debug!("No address to unblock on node {node}");
            return Ok(());
        };

        let output = self.executor.run(context, node, &script).await?;
        ensure_applied(context, node, output)
    }

    /// Blackhole routes currently installed on the node, both address families.
    pub async fn query_routes(&self, context: &str, node: &str) -> Result<AddressSet> {
        debug!("Looking up blackholes on node {node}");

        let output = self
            .executor
            .run(context, node, iproute::LIST_BLACKHOLES_SCRIPT)
            .await?;

        if !output.is_success() {
            return Err(BlackholeError::remote_exec(
                context,
                node,
                format!(
                    "listing routes exited with {:?}: {}",
                    output.status,
                    output.combined()
                ),
            ));
        }

        iproute::parse_blackholes(&output.stdout).map_err(|invalid| BlackholeError::Parse {
            context: context.to_string(),
            node: node.to_string(),
            line: invalid.line,
        })
    }
}

fn ensure_applied(context: &str, node: &str, output: ScriptOutput) -> Result<()> {
    if output.is_success() {
        return Ok(());
    }

    Err(BlackholeError::RouteApply {
        context: context.to_string(),
        node: node.to_string(),
        status: output.status,
        output: output.combined(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
