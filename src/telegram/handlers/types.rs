//! Handler dependencies and the inbound events the dispatcher routes

use std::str::FromStr;
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{Message, MessageId, User};
use teloxide::utils::command::BotCommands;

use crate::core::config::BotSettings;
use crate::session::SessionManager;
use crate::storage::db;
use crate::telegram::bot::Command;
use crate::telegram::keyboards::CallbackAction;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<db::DbPool>,
    pub sessions: Arc<SessionManager>,
    pub settings: Arc<BotSettings>,
    pub bot_username: Option<String>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        db_pool: Arc<db::DbPool>,
        sessions: Arc<SessionManager>,
        settings: Arc<BotSettings>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            db_pool,
            sessions,
            settings,
            bot_username,
        }
    }
}

/// Who an event came from and where replies go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    pub fn from_user(user: &User, chat_id: ChatId) -> Self {
        Self {
            user_id: user.id,
            chat_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }

    /// Storage key for this user.
    pub fn key(&self) -> i64 {
        i64::try_from(self.user_id.0).unwrap_or(0)
    }
}

/// Everything the bot reacts to, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Command {
        sender: Sender,
        command: Command,
        message_id: MessageId,
        /// Message the command replied to, used by /broadcast
        reply_to: Option<MessageId>,
    },
    Document {
        sender: Sender,
        file_id: String,
        file_name: Option<String>,
    },
    Photo {
        sender: Sender,
        /// Largest size variant
        file_id: String,
    },
    Text {
        sender: Sender,
        text: String,
    },
    Callback {
        sender: Sender,
        callback_id: String,
        /// The message carrying the pressed button, if still accessible
        origin: Option<(ChatId, MessageId)>,
        /// `None` for tokens this bot never issued
        action: Option<CallbackAction>,
    },
}

impl InboundEvent {
    /// Classifies a message. Returns `None` for messages without a sender or
    /// with content the bot does not handle.
    pub fn from_message(msg: &Message, bot_username: &str) -> Option<Self> {
        let user = msg.from.as_ref()?;
        let sender = Sender::from_user(user, msg.chat.id);

        if let Some(document) = msg.document() {
            return Some(InboundEvent::Document {
                sender,
                file_id: document.file.id.0.clone(),
                file_name: document.file_name.clone(),
            });
        }

        if let Some(sizes) = msg.photo() {
            let largest = sizes
                .iter()
                .max_by_key(|size| u64::from(size.width) * u64::from(size.height))?;
            return Some(InboundEvent::Photo {
                sender,
                file_id: largest.file.id.0.clone(),
            });
        }

        let text = msg.text()?;
        if let Ok(command) = Command::parse(text, bot_username) {
            return Some(InboundEvent::Command {
                sender,
                command,
                message_id: msg.id,
                reply_to: msg.reply_to_message().map(|reply| reply.id),
            });
        }

        Some(InboundEvent::Text {
            sender,
            text: text.to_string(),
        })
    }

    pub fn from_callback(q: &CallbackQuery) -> Self {
        let origin = q.message.as_ref().map(|m| (m.chat().id, m.id()));
        let chat_id = origin.map(|(chat, _)| chat).unwrap_or_else(|| ChatId::from(q.from.id));

        InboundEvent::Callback {
            sender: Sender::from_user(&q.from, chat_id),
            callback_id: q.id.0.clone(),
            origin,
            action: q.data.as_deref().and_then(|data| CallbackAction::from_str(data).ok()),
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            InboundEvent::Command { sender, .. }
            | InboundEvent::Document { sender, .. }
            | InboundEvent::Photo { sender, .. }
            | InboundEvent::Text { sender, .. }
            | InboundEvent::Callback { sender, .. } => sender,
        }
    }
}
