use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::resource::{self, AssociationState};

pub async fn handle(
    workspace: &Workspace,
    floating_ip: &str,
    port_id: &str,
    region: Option<String>,
) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("フローティング IP {} をポート {} に関連付けます...", floating_ip, port_id).blue()
    );

    let mut state = AssociationState::new(floating_ip, port_id).with_region(region);
    resource::create(&mut state, &workspace.ctx).await?;

    let id = state.id.as_deref().unwrap_or_default();
    println!("{} {}", "✓ 関連付けました:".green().bold(), id.cyan());
    if let Some(fixed_ip) = state.fixed_ip.as_deref().filter(|ip| !ip.is_empty()) {
        println!("  fixed IP: {}", fixed_ip);
    } else {
        println!(
            "  {}",
            "fixed IP は指定していません (Neutron が選択します)".dimmed()
        );
    }
    Ok(())
}
