//! WBT CLI Application

mod cli;

use clap::Parser as _;
use cli::{Cli, Commands, ConfigCommands};

fn init_tracing() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Generate(args) => {
            wbt_sdk::commands::generate_records_file(args.config, args.output, args.seed).await
        }
        Commands::Commit(args) => {
            wbt_sdk::commands::commit_records(args.records, args.report_out).await
        }
        Commands::Sample(args) => {
            wbt_sdk::commands::sample_reads(
                args.records,
                args.exist,
                args.miss,
                args.seed,
                args.samples_out,
            )
            .await
        }
        Commands::Graph(args) => {
            wbt_sdk::commands::export_graph(args.records, args.graph_out).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Schema => wbt_sdk::commands::generator_config_schema(),
        },
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
