use crate::commands::plan::{print_plan, refreshed_plan};
use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::{ApplyResult, Plan, StateFile, StateManager};

pub async fn handle(workspace: &Workspace, yes: bool) -> anyhow::Result<()> {
    let manager = workspace.state_manager();
    let lock = if yes {
        Some(manager.acquire_lock().await?)
    } else {
        None
    };

    let (plan, state) = refreshed_plan(workspace).await?;
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

/// 計画を実行して state を保存する (ロックは呼び出し側で取得済み)
pub async fn execute(
    workspace: &Workspace,
    manager: &StateManager,
    plan: &Plan,
    mut state: StateFile,
) -> anyhow::Result<ApplyResult> {
    if plan.has_changes {
        println!();
        println!("{}", "適用中...".blue());
    }

    let result = floatlink_cloud::apply(
        plan,
        &workspace.loaded.config.associations,
        &mut state,
        &workspace.ctx,
    )
    .await;

    manager.save(&state).await?;
    Ok(result)
}

pub fn report(result: &ApplyResult) -> anyhow::Result<()> {
    if result.succeeded.is_empty() && result.failed.is_empty() {
        return Ok(());
    }

    for ok in &result.succeeded {
        println!("  {} {}", "✓".green(), ok.message);
    }
    for failed in &result.failed {
        println!("  {} {}: {}", "✗".red(), failed.action_id, failed.message);
    }

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!("✓ 完了しました ({} ms)", result.duration_ms)
                .green()
                .bold()
        );
        Ok(())
    } else {
        anyhow::bail!("{} 件のアクションが失敗しました", result.failed.len())
    }
}
