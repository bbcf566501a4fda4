use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::{FloatingIpAssociator, Lookup, RegionResolver};

pub async fn handle(workspace: &Workspace, id: &str, region: Option<&str>) -> anyhow::Result<()> {
    let region = workspace.ctx.resolve_region(region);
    let associator = FloatingIpAssociator::connect(workspace.ctx.catalog(), &region).await?;

    match associator.refresh(id).await? {
        Lookup::Found(view) => {
            println!("{}", format!("フローティング IP {}", id).bold());
            println!("  address: {}", view.floating_ip_address.cyan());
            match view.port_id {
                Some(port_id) => println!("  port:    {}", port_id.cyan()),
                None => println!("  port:    {}", "(未関連付け)".yellow()),
            }
            println!(
                "  region:  {}",
                if view.region.is_empty() {
                    "(未指定)".to_string()
                } else {
                    view.region
                }
            );
        }
        Lookup::Gone => {
            println!(
                "{}",
                format!("フローティング IP {} は存在しません (削除済み)", id).yellow()
            );
        }
    }
    Ok(())
}
