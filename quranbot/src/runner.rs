//! Entry points behind the CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use qbot_core::{init_tracing, Answer};
use qbot_telegram::{run_polling, HttpSendable, Sendable, UnreachableSafeSendable};
use storage::{SqlitePoolManager, UserRepository};
use tracing::{info, instrument};

use crate::components::build_components;
use crate::config::BotConfig;
use crate::routes::QuranbotAnswer;

/// Main entry: validate config, init logging, build components and the route table, then
/// long-poll until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        redis = config.redis_url.is_some(),
        "Initializing bot"
    );
    let components = build_components(&config).await?;
    let answer: Arc<dyn Answer> = Arc::new(QuranbotAnswer::new(&components)?);

    let telegram = config.telegram_config();
    let sendable: Arc<dyn Sendable> = Arc::new(UnreachableSafeSendable::new(
        HttpSendable::new(reqwest::Client::new(), telegram.clone()),
        UserRepository::new(components.pool_manager.clone()),
    ));
    let bot = telegram.bot()?;

    run_polling(
        bot,
        Duration::from_secs(config.poll_timeout_secs),
        answer,
        sendable,
    )
    .await;
    Ok(())
}

/// Creates the schema at `database_url`.
pub async fn init_db(database_url: &str) -> Result<()> {
    SqlitePoolManager::new(database_url)
        .await
        .with_context(|| format!("Failed to initialize database {}", database_url))?;
    println!("Database schema ready: {}", database_url);
    Ok(())
}
