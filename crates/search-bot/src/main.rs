//! Search bot - Main entry point.

use anyhow::Context;
use chat_client::{ChannelId, ChatClient, EventReceiver, Messenger, UserId};
use pagination::{ExpiryReaper, PaginationEngine, ProducerRegistry, ReactionRouter, SessionStore};
use search_bot::commands::{CommandHandler, HelpHandler, SearchHandler};
use search_bot::config::{BotConfig, Config};
use search_bot::dispatch::Dispatcher;
use search_bot::error::AppResult;
use search_bot::notifier::OperatorNotifier;
use search_producers::{ImageSearchProducer, SteamProducer};
use secrecy::ExposeSecret;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Trigger, producer name and help line of each search command.
const SEARCH_COMMANDS: &[(&str, &str, &str)] = &[
    ("!img", "images", "Search for images"),
    ("!steam", "steam", "Look up a game on the Steam store"),
];

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging; the guard flushes the error log on exit
    let _log_guard = init_logging(&config.bot)?;

    info!("Starting search bot...");

    let chat = ChatClient::new(&config.chat.api_url, config.chat.token.expose_secret().clone())
        .context("Failed to create chat client")?;

    if !chat.health_check().await {
        error!("Chat API not reachable at {}", config.chat.api_url);
        return Err(anyhow::anyhow!("Chat API not reachable").into());
    }
    info!("Chat API healthy");

    let messenger: Arc<dyn Messenger> = Arc::new(chat.clone());
    let registry = build_registry(&config);
    let enabled = registry.list_enabled().join(", ");
    if enabled.is_empty() {
        warn!("No result producers enabled - search commands are unavailable");
    } else {
        info!("Result producers enabled: {}", enabled);
    }

    let commands: Vec<(&str, &str, &str)> = SEARCH_COMMANDS
        .iter()
        .copied()
        .filter(|(_, producer, _)| registry.is_enabled(producer))
        .collect();

    let store = SessionStore::new();
    let engine = Arc::new(PaginationEngine::new(
        messenger.clone(),
        store.clone(),
        Arc::new(registry),
        config.pagination.clone(),
    ));

    // Create command handlers
    let mut handlers: Vec<Box<dyn CommandHandler>> = commands
        .iter()
        .map(|(trigger, producer, _)| {
            Box::new(SearchHandler::new(*trigger, *producer, engine.clone()))
                as Box<dyn CommandHandler>
        })
        .collect();
    let help: Vec<(&str, &str)> = commands.iter().map(|(t, _, d)| (*t, *d)).collect();
    handlers.push(Box::new(HelpHandler::new(&help, &config.pagination.glyphs)));
    info!("Registered {} command handlers", handlers.len());

    let router = ReactionRouter::new(engine.clone(), UserId::new(config.chat.bot_user_id.clone()));
    let notifier = OperatorNotifier::new(
        messenger.clone(),
        config.bot.operator_channel.clone().map(ChannelId::new),
    );
    let dispatcher = Arc::new(Dispatcher::new(handlers, messenger.clone(), router, notifier));

    // Start the idle session reaper
    let shutdown = CancellationToken::new();
    let reaper = Arc::new(ExpiryReaper::new(store, messenger, config.reaper.clone()));
    let reaper_handle = reaper.spawn(shutdown.clone());

    info!("Listening for events...");

    let receiver = EventReceiver::new(chat, config.chat.poll_interval);
    let mut stream = Box::pin(receiver.stream());

    // Main event loop; every event runs in its own task
    loop {
        tokio::select! {
            Some(event) = stream.next() => {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.handle(event).await;
                });
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    shutdown.cancel();
    if let Err(e) = reaper_handle.await {
        error!("Reaper task failed: {}", e);
    }

    Ok(())
}

fn build_registry(config: &Config) -> ProducerRegistry {
    let mut registry = ProducerRegistry::new();

    match &config.images.api_key {
        Some(key) => {
            registry.register(Arc::new(
                ImageSearchProducer::new(key.expose_secret().clone())
                    .with_base_url(&config.images.base_url)
                    .with_max_results(config.images.max_results),
            ));
            if !config.images.enabled {
                registry.disable("images");
            }
        }
        None if config.images.enabled => {
            warn!("Image search enabled but IMAGES__API_KEY is not set");
        }
        None => {}
    }

    registry.register(Arc::new(
        SteamProducer::new()
            .with_base_url(&config.steam.base_url)
            .with_country(&config.steam.country)
            .with_max_results(config.steam.max_results),
    ));
    if !config.steam.enabled {
        registry.disable("steam");
    }

    registry
}

fn init_logging(bot: &BotConfig) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&bot.log_level));

    let directory = bot
        .error_log
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = bot
        .error_log
        .file_name()
        .context("bot.error_log must name a file")?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    Ok(guard)
}
