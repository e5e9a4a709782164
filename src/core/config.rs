use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path (the persistence connection string)
/// Read from DATABASE_PATH environment variable
/// No default: the bot refuses to start without it
pub static DATABASE_PATH: Lazy<String> = Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_default());

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: filetailor.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "filetailor.log".to_string()));

/// File extension accepted for uploads (with the leading dot)
/// Read from FILE_EXTENSION environment variable
/// Default: .py
pub static FILE_EXTENSION: Lazy<String> = Lazy::new(|| {
    let raw = env::var("FILE_EXTENSION").unwrap_or_else(|_| ".py".to_string());
    normalize_extension(&raw)
});

/// Normalizes an extension to exactly one leading dot. Blank input falls back to `.py`.
pub fn normalize_extension(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        ".py".to_string()
    } else {
        format!(".{}", trimmed)
    }
}

/// Required channels configuration
pub mod channels {
    use once_cell::sync::Lazy;
    use std::env;

    /// A channel the user must have joined before using the bot
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RequiredChannel {
        /// Telegram chat id of the channel (negative for channels)
        pub chat_id: i64,
        /// Invite link shown on the join button
        pub invite_link: String,
    }

    /// Parses `id|link` entries separated by commas or whitespace.
    ///
    /// Entries without a parseable id are skipped with a warning.
    pub fn parse_required_channels(raw: &str) -> Vec<RequiredChannel> {
        raw.split([',', ' ', '\n', '\t'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (id, link) = part.split_once('|').unwrap_or((part, ""));
                match id.trim().parse::<i64>() {
                    Ok(chat_id) => Some(RequiredChannel {
                        chat_id,
                        invite_link: link.trim().to_string(),
                    }),
                    Err(e) => {
                        log::warn!("Skipping malformed REQUIRED_CHANNELS entry '{}': {}", part, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Channels the user must join
    /// Read from REQUIRED_CHANNELS environment variable, e.g.
    /// `-1002546105906|https://t.me/SPBotz,-1002551633594|https://t.me/+hu1MMHYoW09jZjk1`
    /// Default: empty (no membership gate)
    pub static REQUIRED_CHANNELS: Lazy<Vec<RequiredChannel>> = Lazy::new(|| {
        env::var("REQUIRED_CHANNELS")
            .ok()
            .map(|raw| parse_required_channels(&raw))
            .unwrap_or_default()
    });

    /// Chat id of the channel receiving user/broadcast logs
    /// Read from LOG_CHANNEL_ID environment variable
    pub static LOG_CHANNEL_ID: Lazy<Option<i64>> =
        Lazy::new(|| env::var("LOG_CHANNEL_ID").ok().and_then(|s| s.trim().parse().ok()));

    /// Public link to the log channel, shown in /stats
    /// Read from LOG_CHANNEL_LINK environment variable
    pub static LOG_CHANNEL_LINK: Lazy<Option<String>> = Lazy::new(|| {
        env::var("LOG_CHANNEL_LINK")
            .ok()
            .and_then(|s| if s.trim().is_empty() { None } else { Some(s) })
    });
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// The single administrator allowed to run /stats and /broadcast
    /// Read from ADMIN_ID environment variable
    /// Defaults to 0 if not set (nobody is admin)
    pub static ADMIN_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    });
}

/// Staging area configuration
pub mod staging {
    use once_cell::sync::Lazy;
    use std::env;
    use std::path::PathBuf;

    /// Directory holding uploaded files and thumbnails between prompts
    /// Read from STAGING_DIR environment variable
    /// Default: <system temp dir>/filetailor
    pub static STAGING_DIR: Lazy<PathBuf> = Lazy::new(|| {
        env::var("STAGING_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("filetailor"))
    });
}

/// Health endpoint configuration
pub mod health {
    use once_cell::sync::Lazy;
    use std::env;

    /// Enable the HTTP liveness endpoint
    /// Read from HEALTH_ENABLED environment variable
    /// Default: true
    pub static ENABLED: Lazy<bool> = Lazy::new(|| {
        env::var("HEALTH_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true)
    });

    /// Port for the HTTP liveness endpoint
    /// Read from HEALTH_PORT environment variable
    /// Default: 8080
    pub static PORT: Lazy<u16> = Lazy::new(|| {
        env::var("HEALTH_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080)
    });
}

/// Restart policy for the update listener
pub mod retry {
    use once_cell::sync::Lazy;
    use std::env;
    use std::time::Duration;

    /// Fixed delay before the dispatcher is restarted after a crash
    /// Read from RESTART_DELAY_SECS environment variable
    /// Default: 5 seconds
    pub static RESTART_DELAY_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("RESTART_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5)
    });

    pub fn restart_delay() -> Duration {
        Duration::from_secs(*RESTART_DELAY_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for the Telegram HTTP client (seconds)
    pub const TIMEOUT_SECS: u64 = 120;

    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Runtime settings handed to the handlers.
///
/// Built once from the environment at startup; tests construct it directly.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub bot_token: String,
    pub database_path: String,
    pub required_channels: Vec<channels::RequiredChannel>,
    pub admin_id: i64,
    pub log_channel_id: Option<i64>,
    pub log_channel_link: Option<String>,
    pub file_extension: String,
    pub staging_dir: PathBuf,
}

impl BotSettings {
    /// Collects the settings from the environment and fails fast when the
    /// token or the database path is missing.
    pub fn from_env() -> AppResult<Self> {
        let settings = Self {
            bot_token: BOT_TOKEN.clone(),
            database_path: DATABASE_PATH.clone(),
            required_channels: channels::REQUIRED_CHANNELS.clone(),
            admin_id: *admin::ADMIN_ID,
            log_channel_id: *channels::LOG_CHANNEL_ID,
            log_channel_link: channels::LOG_CHANNEL_LINK.clone(),
            file_extension: FILE_EXTENSION.clone(),
            staging_dir: staging::STAGING_DIR.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.bot_token.trim().is_empty() {
            return Err(AppError::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        if self.database_path.trim().is_empty() {
            return Err(AppError::Config(
                "DATABASE_PATH environment variable is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true when `user_id` is the configured administrator.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id != 0 && self.admin_id == user_id
    }
}
