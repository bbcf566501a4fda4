use crate::workspace::Workspace;
use colored::Colorize;
use floatlink_cloud::{Action, ActionType, Plan, StateFile};

pub async fn handle(workspace: &Workspace) -> anyhow::Result<()> {
    let (plan, _) = refreshed_plan(workspace).await?;
    print_plan(&plan);
    Ok(())
}

/// state を最新化してから floatlink.kdl との差分を計算する
pub async fn refreshed_plan(workspace: &Workspace) -> anyhow::Result<(Plan, StateFile)> {
    let mut state = workspace.state_manager().load().await?;
    let dropped = floatlink_cloud::refresh_state(&mut state, &workspace.ctx).await?;
    for name in &dropped {
        println!(
            "{}",
            format!("'{}' のフローティング IP は削除済みのため state から外します", name).yellow()
        );
    }

    let plan = floatlink_cloud::plan(&workspace.loaded.config.associations, &state, &workspace.ctx);
    Ok((plan, state))
}

pub fn print_plan(plan: &Plan) {
    if !plan.has_changes {
        println!("{}", "変更はありません".green());
        return;
    }

    println!("{}", "実行計画:".bold());
    for action in &plan.actions {
        print_action(action);
    }

    let summary = plan.summary();
    println!();
    println!(
        "計画: {} 件作成, {} 件置換, {} 件削除, {} 件変更なし",
        summary.create, summary.replace, summary.delete, summary.no_change
    );
}

fn print_action(action: &Action) {
    let marker = match action.action_type {
        ActionType::Create => "+".green(),
        ActionType::Replace => "±".yellow(),
        ActionType::Delete => "-".red(),
        ActionType::NoOp => return,
    };
    println!("  {} {}: {}", marker, action.name.cyan(), action.description);

    if !action.changed.is_empty() {
        println!("      変更: {}", action.changed.join(", "));
    }
}
