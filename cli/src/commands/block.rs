use tracing::info;

use super::{ClusterArgs, connect};

pub async fn block(args: &ClusterArgs) -> anyhow::Result<()> {
    let orchestrator = connect(args).await?;
    let inventory = orchestrator.inspect_all().await?;

    orchestrator.block(&inventory).await?;

    info!(
        "Cluster {:?} blocked in {} nodes",
        orchestrator.blocked_context(),
        inventory.target_node_count()
    );
    Ok(())
}
