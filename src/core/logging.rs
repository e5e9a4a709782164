//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup banner describing the active configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config::BotSettings;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the active configuration at application startup
///
/// Lists the channels users must join, where logs go, who the admin is
/// and which uploads are accepted. Never prints the bot token.
pub fn log_startup_configuration(settings: &BotSettings) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🤖 File customization bot is starting...");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if settings.required_channels.is_empty() {
        log::warn!("⚠️  REQUIRED_CHANNELS: not set, membership gate admits everyone");
    } else {
        let ids: Vec<i64> = settings.required_channels.iter().map(|c| c.chat_id).collect();
        log::info!("📢 Force join channels: {:?}", ids);
    }

    match settings.log_channel_id {
        Some(id) => log::info!("📝 Log channel: {}", id),
        None => log::warn!("⚠️  LOG_CHANNEL_ID: not set, user logs are disabled"),
    }

    if settings.admin_id == 0 {
        log::warn!("⚠️  ADMIN_ID: not set, admin commands are disabled");
    } else {
        log::info!("👑 Admin: {}", settings.admin_id);
    }

    log::info!("📁 Accepted extension: {}", settings.file_extension);
    log::info!("📂 Staging directory: {}", settings.staging_dir.display());
    log::info!("🗄  Database: {}", settings.database_path);
}
