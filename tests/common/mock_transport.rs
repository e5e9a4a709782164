//! Recording Transport double
//!
//! Every outbound call is appended to a log the tests can inspect. File
//! downloads, membership answers and broadcast failures are scripted up
//! front.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use filetailor::core::error::{AppError, AppResult};
use filetailor::telegram::{DocumentDelivery, MemberStatus, Transport};
use teloxide::types::{ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId, UserId};
use teloxide::{ApiError, RequestError};

fn api_error(error: ApiError) -> AppError {
    AppError::Telegram(RequestError::Api(error))
}

#[derive(Debug, Clone)]
pub enum Call {
    SendMessage {
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    EditMessage {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    AnswerCallback {
        callback_id: String,
        text: Option<String>,
        show_alert: bool,
    },
    SendDocument {
        chat_id: ChatId,
        delivery: DocumentDelivery,
    },
    FetchFile {
        file_id: String,
    },
    MemberStatus {
        chat_id: ChatId,
        user_id: UserId,
    },
    CopyMessage {
        to: ChatId,
        from: ChatId,
        message_id: MessageId,
    },
}

/// Sent message as seen by the user.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl SentMessage {
    /// Callback tokens of the attached keyboard, row by row flattened.
    pub fn callback_tokens(&self) -> Vec<String> {
        keyboard_tokens(self.keyboard.as_ref())
    }
}

pub fn keyboard_tokens(keyboard: Option<&InlineKeyboardMarkup>) -> Vec<String> {
    keyboard
        .map(|k| {
            k.inline_keyboard
                .iter()
                .flatten()
                .filter_map(|button| match &button.kind {
                    InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    members: Mutex<HashMap<(i64, u64), MemberStatus>>,
    failing_lookups: Mutex<HashSet<i64>>,
    failing_recipients: Mutex<HashSet<i64>>,
    next_message_id: AtomicI32,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            files: Mutex::new(HashMap::new()),
            members: Mutex::new(HashMap::new()),
            failing_lookups: Mutex::new(HashSet::new()),
            failing_recipients: Mutex::new(HashSet::new()),
            next_message_id: AtomicI32::new(1),
        }
    }

    /// Makes `file_id` downloadable with the given content.
    pub fn add_file(&self, file_id: &str, bytes: &[u8]) {
        self.files.lock().unwrap().insert(file_id.to_string(), bytes.to_vec());
    }

    /// Users without a scripted status are reported as having left.
    pub fn set_member(&self, channel: i64, user: u64, status: MemberStatus) {
        self.members.lock().unwrap().insert((channel, user), status);
    }

    pub fn fail_lookups_in(&self, channel: i64) {
        self.failing_lookups.lock().unwrap().insert(channel);
    }

    pub fn fail_delivery_to(&self, chat: i64) {
        self.failing_recipients.lock().unwrap().insert(chat);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn sent_messages(&self, chat: i64) -> Vec<SentMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendMessage {
                    chat_id,
                    text,
                    keyboard,
                } if chat_id.0 == chat => Some(SentMessage {
                    chat_id,
                    text,
                    keyboard,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn last_message(&self, chat: i64) -> Option<SentMessage> {
        self.sent_messages(chat).pop()
    }

    pub fn edits(&self) -> Vec<(ChatId, MessageId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::EditMessage {
                    chat_id,
                    message_id,
                    text,
                    ..
                } => Some((chat_id, message_id, text)),
                _ => None,
            })
            .collect()
    }

    /// `(text, show_alert)` of every callback answer.
    pub fn callback_answers(&self) -> Vec<(Option<String>, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AnswerCallback { text, show_alert, .. } => Some((text, show_alert)),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<(ChatId, DocumentDelivery)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendDocument { chat_id, delivery } => Some((chat_id, delivery)),
                _ => None,
            })
            .collect()
    }

    pub fn copies(&self) -> Vec<ChatId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CopyMessage { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FetchFile { file_id } => Some(file_id),
                _ => None,
            })
            .collect()
    }

    pub fn member_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::MemberStatus { .. }))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<MessageId> {
        self.record(Call::SendMessage {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        self.record(Call::EditMessage {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>, show_alert: bool) -> AppResult<()> {
        self.record(Call::AnswerCallback {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, delivery: DocumentDelivery) -> AppResult<()> {
        self.record(Call::SendDocument { chat_id, delivery });
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> AppResult<Vec<u8>> {
        self.record(Call::FetchFile {
            file_id: file_id.to_string(),
        });
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| api_error(ApiError::Unknown(format!("unknown file id {}", file_id))))
    }

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> AppResult<MemberStatus> {
        self.record(Call::MemberStatus { chat_id, user_id });
        if self.failing_lookups.lock().unwrap().contains(&chat_id.0) {
            return Err(api_error(ApiError::ChatNotFound));
        }
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&(chat_id.0, user_id.0))
            .copied()
            .unwrap_or(MemberStatus::Left))
    }

    async fn copy_message(&self, to: ChatId, from: ChatId, message_id: MessageId) -> AppResult<()> {
        self.record(Call::CopyMessage { to, from, message_id });
        if self.failing_recipients.lock().unwrap().contains(&to.0) {
            return Err(api_error(ApiError::BotBlocked));
        }
        Ok(())
    }
}
