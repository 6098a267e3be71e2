use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use interview_bot::bot::{self, TelegramNotifier};
use interview_bot::config::BotConfig;
use interview_bot::localization::init_localization;
use interview_bot::registry::InvitationRegistry;
use interview_bot::router::Router;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting interview invitation bot");

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Cannot start without configuration");
            return Err(e.into());
        }
    };

    init_localization()?;

    let bot = Bot::new(&config.telegram_bot_token);

    // The registry lives for the whole process and is shared through the router
    let registry = Arc::new(InvitationRegistry::new());
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let router = Arc::new(Router::new(registry, notifier, config.router.clone()));

    info!(
        default_language = %config.router.default_language,
        resolution = ?config.router.resolution,
        strict_date_replies = config.router.strict_date_replies,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
