mod commands;
mod workspace;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floatlink")]
#[command(about = "フローティング IP をポートと LB の VIP に結びつける", long_about = None)]
struct Cli {
    /// デバッグログを出力
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// フローティング IP をポートに関連付ける
    Associate {
        /// フローティング IP のアドレスまたは ID
        floating_ip: String,
        /// 関連付け先のポート ID
        port_id: String,
        /// リージョン (省略時は provider の region、OS_REGION_NAME)
        #[arg(short, long)]
        region: Option<String>,
    },
    /// 関連付けの現在の状態を表示
    Show {
        /// フローティング IP の ID
        id: String,
        #[arg(short, long)]
        region: Option<String>,
    },
    /// フローティング IP をポートから外す
    Disassociate {
        /// フローティング IP の ID
        id: String,
        /// エラーメッセージに表示するポート ID
        #[arg(long, default_value = "")]
        port_id: String,
        #[arg(short, long)]
        region: Option<String>,
    },
    /// 既存の関連付けを state に取り込む
    Import {
        /// floatlink.kdl の association 名
        name: String,
        /// フローティング IP の ID
        id: String,
        #[arg(short, long)]
        region: Option<String>,
    },
    /// floatlink.kdl と state の差分を表示
    Plan,
    /// 差分を適用
    Apply {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// 関連付けを解除して state から削除
    Destroy {
        /// association 名 (省略時はすべて)
        name: Option<String>,
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// バージョン情報を表示
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("floatlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let workspace = workspace::Workspace::open()?;

    match cli.command {
        Commands::Associate {
            floating_ip,
            port_id,
            region,
        } => commands::associate::handle(&workspace, &floating_ip, &port_id, region).await?,
        Commands::Show { id, region } => {
            commands::show::handle(&workspace, &id, region.as_deref()).await?
        }
        Commands::Disassociate {
            id,
            port_id,
            region,
        } => commands::disassociate::handle(&workspace, &id, &port_id, region.as_deref()).await?,
        Commands::Import { name, id, region } => {
            commands::import::handle(&workspace, &name, &id, region).await?
        }
        Commands::Plan => commands::plan::handle(&workspace).await?,
        Commands::Apply { yes } => commands::apply::handle(&workspace, yes).await?,
        Commands::Destroy { name, yes } => {
            commands::destroy::handle(&workspace, name.as_deref(), yes).await?
        }
        Commands::Version => unreachable!("version is handled before loading config"),
    }

    Ok(())
}
