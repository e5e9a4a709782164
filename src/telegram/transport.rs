//! The slice of the Bot API the handlers depend on.
//!
//! Handlers talk to [`Transport`] instead of `teloxide::Bot` directly so the
//! whole flow can run against a recording double in tests.

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, FileId, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};

use crate::core::error::AppResult;

/// Name the thumbnail is uploaded under.
pub const THUMBNAIL_FILE_NAME: &str = "thumbnail.jpg";

/// A user's standing in a channel, as far as the gate cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Present,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn is_present(self) -> bool {
        self == MemberStatus::Present
    }
}

/// Everything needed to send the customized document back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDelivery {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Plain text, sent without a parse mode
    pub caption: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
}

/// Outbound chat operations. Message texts are HTML.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<MessageId>;

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>, show_alert: bool) -> AppResult<()>;

    async fn send_document(&self, chat_id: ChatId, delivery: DocumentDelivery) -> AppResult<()>;

    /// Resolves a file id and downloads its bytes.
    async fn fetch_file(&self, file_id: &str) -> AppResult<Vec<u8>>;

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> AppResult<MemberStatus>;

    async fn copy_message(&self, to: ChatId, from: ChatId, message_id: MessageId) -> AppResult<()>;
}

/// [`Transport`] backed by the real Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<MessageId> {
        let mut request = self.bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        Ok(request.await?.id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let mut request = self
            .bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        match request.await {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>, show_alert: bool) -> AppResult<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        if show_alert {
            request = request.show_alert(true);
        }
        request.await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, delivery: DocumentDelivery) -> AppResult<()> {
        let document = InputFile::memory(delivery.bytes).file_name(delivery.file_name);
        let mut request = self.bot.send_document(chat_id, document);
        if let Some(caption) = delivery.caption.filter(|c| !c.is_empty()) {
            request = request.caption(caption);
        }
        if let Some(thumbnail) = delivery.thumbnail {
            request = request.thumbnail(InputFile::memory(thumbnail).file_name(THUMBNAIL_FILE_NAME));
        }
        request.await?;
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> AppResult<Vec<u8>> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        let mut bytes = Vec::with_capacity(file.size as usize);
        self.bot.download_file(&file.path, &mut bytes).await?;
        Ok(bytes)
    }

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> AppResult<MemberStatus> {
        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        let status = if member.kind.is_banned() {
            MemberStatus::Banned
        } else if member.kind.is_left() {
            MemberStatus::Left
        } else {
            MemberStatus::Present
        };
        Ok(status)
    }

    async fn copy_message(&self, to: ChatId, from: ChatId, message_id: MessageId) -> AppResult<()> {
        self.bot.copy_message(to, from, message_id).await?;
        Ok(())
    }
}
