//! Inline keyboards and the callback tokens behind their buttons

use strum::{AsRefStr, Display, EnumString};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config::channels::RequiredChannel;
use crate::session::OfferedAction;

/// Callback data carried by the bot's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CallbackAction {
    Verify,
    Thumbnail,
    Caption,
    Rename,
    Download,
}

impl From<OfferedAction> for CallbackAction {
    fn from(action: OfferedAction) -> Self {
        match action {
            OfferedAction::Thumbnail => CallbackAction::Thumbnail,
            OfferedAction::Caption => CallbackAction::Caption,
            OfferedAction::Rename => CallbackAction::Rename,
            OfferedAction::Download => CallbackAction::Download,
        }
    }
}

fn action_label(action: OfferedAction) -> &'static str {
    match action {
        OfferedAction::Thumbnail => "📷 Thumbnail",
        OfferedAction::Caption => "📝 Caption",
        OfferedAction::Rename => "✏️ Rename",
        OfferedAction::Download => "📥 Download File",
    }
}

/// Customization menu, two buttons per row.
pub fn options_keyboard(actions: &[OfferedAction]) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = actions
        .iter()
        .map(|&action| InlineKeyboardButton::callback(action_label(action), CallbackAction::from(action).as_ref()))
        .collect();

    InlineKeyboardMarkup::new(buttons.chunks(2).map(|row| row.to_vec()))
}

/// One join button per required channel, then the verify button.
///
/// Channels without a usable invite link get no button.
pub fn join_keyboard(channels: &[RequiredChannel]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::with_capacity(channels.len() + 1);

    for (index, channel) in channels.iter().enumerate() {
        match url::Url::parse(&channel.invite_link) {
            Ok(link) => {
                let label = if index == 0 {
                    "📢 Join Channel".to_string()
                } else {
                    format!("📢 Join Channel {}", index + 1)
                };
                rows.push(vec![InlineKeyboardButton::url(label, link)]);
            }
            Err(e) => log::warn!("No join button for channel {}: bad invite link ({})", channel.chat_id, e),
        }
    }

    rows.push(vec![InlineKeyboardButton::callback(
        "✅ Verify Membership",
        CallbackAction::Verify.as_ref(),
    )]);
    InlineKeyboardMarkup::new(rows)
}
