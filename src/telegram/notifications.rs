use chrono::{DateTime, Utc};
use teloxide::types::ChatId;
use teloxide::utils::html::escape;

use crate::core::config::BotSettings;
use crate::telegram::transport::Transport;

/// Posts an entry to the log channel, if one is configured.
///
/// Failures are logged and swallowed; the log channel never blocks a user
/// flow.
pub async fn notify_log_channel(transport: &dyn Transport, settings: &BotSettings, text: &str) {
    let Some(channel_id) = settings.log_channel_id else {
        log::debug!("Log channel not configured, dropping entry");
        return;
    };

    if let Err(e) = transport.send_message(ChatId(channel_id), text, None).await {
        log::error!("Failed to post to log channel {}: {}", channel_id, e);
    }
}

/// Log entry for a user's first /start.
pub fn new_user_entry(user_id: i64, first_name: &str, last_name: Option<&str>, username: Option<&str>) -> String {
    let full_name = match last_name {
        Some(last) if !last.is_empty() => format!("{} {}", first_name, last),
        _ => first_name.to_string(),
    };
    let username = username.map(|u| format!("@{}", u)).unwrap_or_else(|| "N/A".to_string());

    format!(
        "🆕 <b>New user started the File Editing bot</b>\n\n\
👤 Name: {}\n\
🆔 User ID: <code>{}</code>\n\
📛 Username: {}\n\
📩 Message: The user has started the bot.",
        escape(&full_name),
        user_id,
        escape(&username),
    )
}

/// Log entry summarizing an admin broadcast.
pub fn broadcast_entry(admin_name: &str, admin_id: i64, success: usize, failed: usize, at: DateTime<Utc>) -> String {
    format!(
        "📢 <b>Admin Broadcast Sent</b>\n\n\
👤 Admin: {}\n\
🆔 Admin ID: <code>{}</code>\n\
👥 Sent to: {} users\n\
❌ Failed: {} users\n\
📅 Time: {}",
        escape(admin_name),
        admin_id,
        success,
        failed,
        at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
