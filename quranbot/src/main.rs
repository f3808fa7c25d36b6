//! quranbot CLI: run the bot or initialize the database. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use quranbot::config::database_url_from_env;
use quranbot::{init_db, run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::InitDb => init_db(&database_url_from_env()).await,
    }
}
