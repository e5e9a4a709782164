//! Test fixtures for handler tests
//!
//! Provides TestBot, which wires the real handlers to:
//! - A recording mock transport
//! - A throwaway SQLite database
//! - A throwaway staging directory

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use filetailor::core::config::channels::RequiredChannel;
use filetailor::core::config::BotSettings;
use filetailor::session::{SessionManager, SessionRecord};
use filetailor::storage::{create_pool, get_connection, get_profile, DbPool, StagingArea, UserProfile};
use filetailor::telegram::{dispatch, CallbackAction, Command, HandlerDeps, InboundEvent, Sender};
use teloxide::types::{ChatId, MessageId, UserId};
use tempfile::TempDir;

use super::mock_transport::MockTransport;

pub const USER: u64 = 1001;
pub const OTHER_USER: u64 = 1002;
pub const ADMIN: u64 = 9000;
pub const LOG_CHANNEL: i64 = -100_999;

/// Message id the callback buttons are attached to.
pub const MENU_MESSAGE: MessageId = MessageId(500);

pub struct TestBot {
    pub transport: MockTransport,
    pub deps: HandlerDeps,
    pub db_pool: Arc<DbPool>,
    _dir: TempDir,
}

impl TestBot {
    /// A bot without required channels: everyone passes the gate.
    pub fn new() -> Self {
        Self::with_channels(Vec::new())
    }

    pub fn with_channels(channels: Vec<RequiredChannel>) -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("bot.sqlite");
        let staging_dir = dir.path().join("staging");

        let settings = BotSettings {
            bot_token: "123456:TEST".to_string(),
            database_path: db_path.to_string_lossy().into_owned(),
            required_channels: channels,
            admin_id: ADMIN as i64,
            log_channel_id: Some(LOG_CHANNEL),
            log_channel_link: Some("https://t.me/filetailor_logs".to_string()),
            file_extension: ".py".to_string(),
            staging_dir: staging_dir.clone(),
        };

        let db_pool = Arc::new(create_pool(&settings.database_path).unwrap());
        let staging = Arc::new(StagingArea::new(staging_dir));
        let sessions = Arc::new(SessionManager::new(Arc::clone(&db_pool), staging, ".py"));
        let deps = HandlerDeps::new(
            Arc::clone(&db_pool),
            sessions,
            Arc::new(settings),
            Some("filetailor_bot".to_string()),
        );

        Self {
            transport: MockTransport::new(),
            deps,
            db_pool,
            _dir: dir,
        }
    }

    pub async fn send(&self, event: InboundEvent) {
        dispatch(&self.transport, &self.deps, event).await.unwrap();
    }

    pub fn session(&self, user: u64) -> Option<SessionRecord> {
        self.deps.sessions.current(user as i64).unwrap()
    }

    pub fn profile(&self, user: u64) -> Option<UserProfile> {
        let conn = get_connection(&self.db_pool).unwrap();
        get_profile(&conn, user as i64).unwrap()
    }

    /// Stages `name` for `user` as if they had uploaded it.
    pub async fn upload(&self, user: u64, file_id: &str, name: &str, bytes: &[u8]) -> SessionRecord {
        self.transport.add_file(file_id, bytes);
        self.send(document(user, file_id, Some(name))).await;
        self.session(user).unwrap()
    }

    pub fn staged_file(&self, user: u64) -> PathBuf {
        self.session(user).unwrap().file_path
    }
}

pub fn sender(user: u64) -> Sender {
    Sender {
        user_id: UserId(user),
        chat_id: ChatId(user as i64),
        first_name: format!("User{}", user),
        last_name: None,
        username: Some(format!("user{}", user)),
    }
}

pub fn command(user: u64, command: Command) -> InboundEvent {
    InboundEvent::Command {
        sender: sender(user),
        command,
        message_id: MessageId(10),
        reply_to: None,
    }
}

pub fn reply_command(user: u64, command: Command, reply_to: MessageId) -> InboundEvent {
    InboundEvent::Command {
        sender: sender(user),
        command,
        message_id: MessageId(11),
        reply_to: Some(reply_to),
    }
}

pub fn document(user: u64, file_id: &str, file_name: Option<&str>) -> InboundEvent {
    InboundEvent::Document {
        sender: sender(user),
        file_id: file_id.to_string(),
        file_name: file_name.map(str::to_string),
    }
}

pub fn photo(user: u64, file_id: &str) -> InboundEvent {
    InboundEvent::Photo {
        sender: sender(user),
        file_id: file_id.to_string(),
    }
}

pub fn text(user: u64, text: &str) -> InboundEvent {
    InboundEvent::Text {
        sender: sender(user),
        text: text.to_string(),
    }
}

pub fn callback(user: u64, action: CallbackAction) -> InboundEvent {
    InboundEvent::Callback {
        sender: sender(user),
        callback_id: format!("cb-{}-{}", user, action),
        origin: Some((ChatId(user as i64), MENU_MESSAGE)),
        action: Some(action),
    }
}

pub fn channel(chat_id: i64) -> RequiredChannel {
    RequiredChannel {
        chat_id,
        invite_link: format!("https://t.me/channel{}", chat_id.unsigned_abs()),
    }
}
