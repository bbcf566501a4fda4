use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::resource;

pub async fn handle(
    workspace: &Workspace,
    name: &str,
    id: &str,
    region: Option<String>,
) -> anyhow::Result<()> {
    let Some(tracked) = resource::import(id, region, &workspace.ctx).await?.found() else {
        anyhow::bail!("フローティング IP {} が見つかりません", id);
    };

    if workspace.loaded.config.association(name).is_none() {
        println!(
            "{}",
            format!(
                "警告: association '{}' は floatlink.kdl に宣言されていません。次の apply で削除されます。",
                name
            )
            .yellow()
        );
    }

    let manager = workspace.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    if let Some(existing) = state.name_for_id(id).filter(|n| *n != name) {
        anyhow::bail!(
            "フローティング IP {} は既に '{}' として管理されています",
            id,
            existing
        );
    }

    println!(
        "{} {} ({} → {})",
        "✓ インポートしました:".green().bold(),
        name.cyan(),
        tracked.floating_ip,
        tracked.port_id
    );
    state.set(name, tracked);
    manager.save(&state).await?;
    lock.release().await?;
    Ok(())
}
