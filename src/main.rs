mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use otaku::{api, config::Config, db::MangaStore, observability};
use tracing::info;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| format!("Failed to load config: {e}"))?;

    match cli.command {
        Commands::Server(args) => api::run(config, args.address).await?,
        Commands::InitDb => init_db(&config).await?,
    }

    Ok(())
}

async fn init_db(config: &Config) -> Result<(), AnyError> {
    let store = MangaStore::connect(&config.database).await?;

    if config.database.seed_demo {
        if store.seed_demo_if_empty().await?.is_none() {
            info!("Catalog already has content, demo seed skipped");
        }
    }

    store.close().await;
    info!(url = %config.database.url, "Database initialised");
    Ok(())
}
