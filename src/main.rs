use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use battlecard::app::AppContext;
use battlecard::cli::{commands, Cli, Commands};
use battlecard::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::Analyze { url, skip_extras } => {
            commands::analyze_url(&ctx, &url, skip_extras).await?;
        }
        Commands::Paste { file, skip_extras } => {
            commands::analyze_paste(&ctx, file.as_deref(), skip_extras).await?;
        }
        Commands::Batch { file } => {
            commands::analyze_batch(&ctx, &file).await?;
        }
        Commands::List => {
            commands::list_competitors(&ctx)?;
        }
        Commands::Show { company } => {
            commands::show_competitor(&ctx, &company)?;
        }
        Commands::Remove { company } => {
            commands::remove_competitor(&ctx, &company)?;
        }
        Commands::Outcome { company, result } => {
            commands::record_outcome(&ctx, &company, result.into())?;
        }
        Commands::Share { company } => {
            commands::share_competitor(&ctx, &company)?;
        }
        Commands::Import { token } => {
            commands::import_shared(&ctx, &token)?;
        }
    }

    Ok(())
}
