use super::{ClusterArgs, connect};
use crate::terminal::print;

pub async fn show(args: &ClusterArgs) -> anyhow::Result<()> {
    let orchestrator = connect(args).await?;
    let inventory = orchestrator.inspect_all().await?;
    let report = orchestrator.status(&inventory).await?;

    if args.verbose {
        print::status_summary(&report);
        print::fat_separator();
    }

    print::report(&report)
}
