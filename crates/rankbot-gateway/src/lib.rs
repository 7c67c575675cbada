//! # rankbot-gateway
//!
//! Telegram front end of the community bot: the Bot API client, command and
//! callback parsing, message rendering, the long-polling dispatcher, the
//! daily reset scheduler and the optional health server.

pub mod bot;
pub mod commands;
pub mod render;
pub mod server;
pub mod telegram;

use std::sync::Arc;

use rankbot_common::{load_rules, AppConfig, AppError};
use rankbot_db::{SqliteMemberRepository, SqliteModerationLogRepository};
use rankbot_service::ServiceContextBuilder;
use tracing::{error, info};

use crate::bot::{scheduler, BotState, Dispatcher};
use crate::server::{create_app, run_server, HealthState};
use crate::telegram::TelegramClient;

/// Initialize all dependencies and create `BotState`
pub async fn create_bot_state(config: AppConfig) -> Result<BotState, AppError> {
    let rules = load_rules(config.rules_file.as_deref())?;
    info!(
        ranks = rules.ranks.tiers().len(),
        quest_brackets = rules.quests.brackets.len(),
        "Game rules loaded"
    );

    info!("Connecting to SQLite...");
    let pool = rankbot_db::connect(&rankbot_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let client = TelegramClient::new(&config.bot).map_err(AppError::internal)?;
    let me = client.get_me().await.map_err(AppError::internal)?;
    let username = me.username.clone().unwrap_or_default();
    info!(bot_id = me.id, username = %username, "Authorized with Telegram");

    let client = Arc::new(client);
    let service_context = ServiceContextBuilder::new()
        .member_repo(Arc::new(SqliteMemberRepository::new(pool.clone())))
        .moderation_log_repo(Arc::new(SqliteModerationLogRepository::new(pool)))
        .platform(client.clone())
        .rules(Arc::new(rules))
        .bot_id(me.user_id())
        .build()?;

    Ok(BotState::new(Arc::new(service_context), client, config, &username))
}

/// Run the bot until Ctrl+C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let health = config.health.clone();
    let state = create_bot_state(config).await?;

    tokio::spawn(scheduler::run_daily_reset(state.shared_context()));

    if let Some(health) = health {
        let app = create_app(HealthState::new(state.shared_context()));
        tokio::spawn(async move {
            if let Err(e) = run_server(app, &health.address()).await {
                error!(error = %e, "Health server stopped");
            }
        });
    }

    let dispatcher = Dispatcher::new(state);
    tokio::select! {
        () = dispatcher.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.map_err(AppError::internal)?;
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
