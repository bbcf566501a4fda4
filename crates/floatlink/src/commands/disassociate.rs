use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::{FloatingIpAssociator, RegionResolver};

pub async fn handle(
    workspace: &Workspace,
    id: &str,
    port_id: &str,
    region: Option<&str>,
) -> anyhow::Result<()> {
    let region = workspace.ctx.resolve_region(region);
    let associator = FloatingIpAssociator::connect(workspace.ctx.catalog(), &region).await?;

    associator.disassociate(id, port_id).await?;

    println!(
        "{} {}",
        "✓ 関連付けを解除しました:".green().bold(),
        id.cyan()
    );
    Ok(())
}
