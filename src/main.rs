use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::time::sleep;

use filetailor::cli::{Cli, Commands};
use filetailor::core::config::{self, BotSettings};
use filetailor::core::health_server::start_health_server;
use filetailor::core::{init_logger, log_startup_configuration};
use filetailor::session::SessionManager;
use filetailor::storage::{count_profiles, count_sessions, create_pool, get_connection, ProfileFilter, StagingArea};
use filetailor::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the bot
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Log panics from inside the dispatcher instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot().await,
        Commands::Stats => print_stats(),
    }
}

fn print_stats() -> Result<()> {
    if config::DATABASE_PATH.trim().is_empty() {
        anyhow::bail!("DATABASE_PATH environment variable is required");
    }
    let pool = create_pool(&config::DATABASE_PATH)?;
    let conn = get_connection(&pool)?;
    let today = chrono::Utc::now().date_naive();

    println!("Total users:       {}", count_profiles(&conn, ProfileFilter::All)?);
    println!("New users today:   {}", count_profiles(&conn, ProfileFilter::FirstSeenOn(today))?);
    println!("Active sessions:   {}", count_sessions(&conn)?);
    Ok(())
}

async fn run_bot() -> Result<()> {
    // Fails fast on a missing token or database path
    let settings = Arc::new(BotSettings::from_env()?);
    log_startup_configuration(&settings);

    let db_pool = Arc::new(create_pool(&settings.database_path)?);
    log::info!("Database ready at {}", settings.database_path);

    let staging = Arc::new(StagingArea::new(settings.staging_dir.clone()));
    staging.ensure_dir().await?;
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&db_pool),
        staging,
        settings.file_extension.clone(),
    ));

    let bot = create_bot(&settings.bot_token)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let bot_username = {
        use teloxide::prelude::Requester;
        match bot.get_me().await {
            Ok(me) => {
                let username = me.username.clone();
                log::info!("Logged in as @{}", username.as_deref().unwrap_or("?"));
                username
            }
            Err(e) => {
                log::warn!("Failed to fetch bot identity: {}", e);
                None
            }
        }
    };

    if *config::health::ENABLED {
        let health_db = Arc::clone(&db_pool);
        tokio::spawn(async move {
            if let Err(e) = start_health_server(*config::health::PORT, health_db).await {
                log::error!("Health server stopped: {}", e);
            }
        });
    }

    let deps = HandlerDeps::new(Arc::clone(&db_pool), sessions, Arc::clone(&settings), bot_username);
    let handler = schema(deps);

    log::info!("🤖 Bot is running");

    // Run the dispatcher; restart after a fixed delay whenever it crashes
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // A separate task isolates panics from this loop
        let handle = tokio::spawn(async move {
            use teloxide::prelude::*;
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                log::info!(
                    "Restarting dispatcher in {}s...",
                    config::retry::restart_delay().as_secs()
                );
                sleep(config::retry::restart_delay()).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}
