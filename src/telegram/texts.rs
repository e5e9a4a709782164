//! User-facing message texts (HTML parse mode)

use teloxide::utils::html::escape;

pub const JOIN_REQUIRED: &str = "📢 <b>Channel Membership Required</b>\n\n\
To use this bot, you need to join our channels first!\n\n\
✨ <b>Benefits of joining:</b>\n\
• Get access to this file editor\n\
• Stay updated with latest features\n\
• Join our developer community\n\n\
👇 <b>Join the channels below and then click Verify:</b>";

pub const JOIN_FIRST: &str = "❌ Please join our channels first to use this bot!";
pub const JOIN_ALL_ALERT: &str = "❌ Please join all channels first! Make sure you've joined every channel.";
pub const SEND_FILE_FIRST: &str = "❌ Please send a file first!";
pub const NO_FILE_FOUND: &str = "❌ No file found! Please send a file first.";
pub const FILE_SENT: &str = "✅ File sent successfully with your customizations!";
pub const DOWNLOAD_FAILED: &str = "❌ Failed to download your file, please try again.";
pub const UPLOAD_ACCEPTED: &str = "✅ <b>File downloaded successfully!</b>\n\n🎛 <b>Customization Options:</b>";
pub const THUMBNAIL_PROMPT: &str = "📷 <b>Send the photo you want to use as thumbnail:</b>";
pub const CAPTION_PROMPT: &str = "📝 <b>Please send the caption text that will appear below your file:</b>";
pub const THUMBNAIL_SET: &str = "✅ <b>Thumbnail set successfully!</b>\n\n🎛 <b>Choose your next action:</b>";
pub const PONG: &str = "🏓 Pong!";
pub const NOT_AUTHORIZED: &str = "❌ You are not authorized to use this command.";
pub const BROADCAST_USAGE: &str = "❌ <b>Please reply to a message to broadcast it.</b>\n\n\
💡 <i>Example: Reply to any message with /broadcast</i>";

/// Upper bound Telegram puts on callback alert texts.
const ALERT_LIMIT: usize = 200;

pub fn welcome(first_name: &str, extension: &str) -> String {
    format!(
        "✨ <b>Welcome {name}!</b> ✨\n\n\
🤖 <b>Welcome to the File Editing Bot!</b>\n\n\
📁 <b>What I can do for you:</b>\n\
• 📷 Add custom thumbnails to your files\n\
• 📝 Add custom captions to your files\n\
• ✏️ Rename your files\n\
• 📥 Download customized files\n\n\
🚀 <b>How to use:</b>\n\
1. Send me a <code>{ext}</code> file\n\
2. Customize it using the buttons\n\
3. Download your enhanced file!\n\n\
💡 <b>Tip:</b> You can customize several aspects of your file before downloading.\n\n\
🔧 <b>Need help?</b> Use /help",
        name = escape(first_name),
        ext = escape(extension),
    )
}

/// Shorter welcome shown after a successful verify.
pub fn verified(first_name: &str, extension: &str) -> String {
    format!(
        "✨ <b>Welcome {}!</b> ✨\n\n\
🤖 <b>Welcome to the File Editing Bot!</b>\n\n\
📁 <b>Ready to enhance your files?</b>\n\
Send me a <code>{}</code> file and let's get started!",
        escape(first_name),
        escape(extension),
    )
}

pub fn help(extension: &str) -> String {
    let ext = escape(extension);
    format!(
        "🤖 <b>File Editing Bot Help Guide</b>\n\n\
🎯 <b>How to use this bot:</b>\n\n\
1. <b>Start</b> → Send /start and join our channels\n\
2. <b>Upload</b> → Send me a <code>{ext}</code> file\n\
3. <b>Customize</b> → Use the buttons to:\n\
   - 📷 <b>Add Thumbnail</b> - Set a custom image preview\n\
   - 📝 <b>Add Caption</b> - Add text that appears below the file when sent\n\
   - ✏️ <b>Rename</b> - Change the actual file name\n\
4. <b>Download</b> → Get your enhanced file!\n\n\
🛠 <b>Available Commands:</b>\n\
• /start - Start the bot\n\
• /help - Show this help message\n\
• /ping - Check bot response time\n\n\
📁 <b>Supported Files:</b> <code>{ext}</code> only\n\n\
💡 <b>Notes:</b>\n\
• <b>Caption</b>: Text that appears below your file when sent\n\
• <b>Rename</b>: Changes the file name the download gets\n\
• <b>Thumbnail</b>: Image preview for your file\n\
• Each new file clears previous customizations"
    )
}

pub fn wrong_extension(extension: &str) -> String {
    format!("❌ Please send a <code>{}</code> file only!", escape(extension))
}

pub fn rename_prompt(extension: &str) -> String {
    format!(
        "📝 <b>What do you want to name the file?</b>\n\n💡 <i>Just type the name without the {} extension</i>",
        escape(extension)
    )
}

pub fn caption_set(caption: &str) -> String {
    format!(
        "✅ <b>Caption set successfully!</b>\n\n📝 <b>Your caption:</b> {}\n\n🎛 <b>Choose your next action:</b>",
        escape(caption)
    )
}

pub fn renamed(file_name: &str) -> String {
    format!(
        "✅ <b>File renamed to:</b> <code>{}</code>\n\n🎛 <b>Choose your next action:</b>",
        escape(file_name)
    )
}

pub fn pong(latency_ms: f64) -> String {
    format!("🏓 <b>Pong!</b>\n⏱ <b>Response time:</b> <code>{:.2}ms</code>", latency_ms)
}

pub fn stats(total_users: u64, today_users: u64, active_sessions: u64, log_link: Option<&str>) -> String {
    let mut text = format!(
        "📊 <b>Bot Statistics Dashboard</b>\n\n\
👥 <b>Total Users:</b> <code>{}</code>\n\
📈 <b>Today's New Users:</b> <code>{}</code>\n\
📊 <b>Active Sessions:</b> <code>{}</code>",
        total_users, today_users, active_sessions
    );
    if let Some(link) = log_link {
        text.push_str(&format!(
            "\n📢 <b>Log Channel:</b> <a href=\"{}\">View Logs</a>",
            escape(link)
        ));
    }
    text
}

pub fn broadcast_started(recipients: usize) -> String {
    format!("📢 <b>Starting broadcast to</b> <code>{}</code> <b>users...</b>", recipients)
}

pub fn broadcast_finished(success: usize, failed: usize) -> String {
    format!(
        "✅ <b>Broadcast Completed!</b>\n\n✅ <b>Success:</b> <code>{}</code> users\n❌ <b>Failed:</b> <code>{}</code> users",
        success, failed
    )
}

/// Alert shown when delivering the customized file fails.
pub fn delivery_failed(error: &str) -> String {
    truncate_alert(&format!("❌ Error sending file: {}", error))
}

fn truncate_alert(text: &str) -> String {
    if text.chars().count() <= ALERT_LIMIT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(ALERT_LIMIT - 1).collect();
    cut.push('…');
    cut
}
