use crate::commands::apply::{execute, report};
use crate::commands::plan::print_plan;
use crate::workspace::Workspace;
use floatlink_cloud::{ActionType, Plan};

pub async fn handle(workspace: &Workspace, name: Option<&str>, yes: bool) -> anyhow::Result<()> {
    let manager = workspace.state_manager();
    let lock = if yes {
        Some(manager.acquire_lock().await?)
    } else {
        None
    };

    let mut state = manager.load().await?;
    floatlink_cloud::refresh_state(&mut state, &workspace.ctx).await?;

    if let Some(name) = name
        && state.get(name).is_none()
    {
        anyhow::bail!("association '{}' は state にありません", name);
    }

    // 宣言を空として計画すると、state にあるものはすべて Delete になる
    let deletes = floatlink_cloud::plan(&[], &state, &workspace.ctx)
        .actions
        .into_iter()
        .filter(|a| a.action_type == ActionType::Delete)
        .filter(|a| name.is_none_or(|n| a.name == n))
        .collect();
    let plan = Plan::new(deletes);
    print_plan(&plan);

    let Some(lock) = lock else {
        if plan.has_changes {
            println!();
            println!("実行するには --yes オプションを指定してください");
        }
        return Ok(());
    };

    let result = execute(workspace, &manager, &plan, state).await;
    lock.release().await?;
    report(&result?)
}
