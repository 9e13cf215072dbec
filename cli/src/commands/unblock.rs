use tracing::info;

use super::{ClusterArgs, connect};

pub async fn unblock(args: &ClusterArgs) -> anyhow::Result<()> {
    let orchestrator = connect(args).await?;
    let inventory = orchestrator.inspect_all().await?;

    orchestrator.unblock(&inventory).await?;

    info!(
        "Cluster {:?} unblocked in {} nodes",
        orchestrator.blocked_context(),
        inventory.target_node_count()
    );
    Ok(())
}
