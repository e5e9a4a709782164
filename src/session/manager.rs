//! Session operations that touch both the database and the staging area.

use std::sync::Arc;

use crate::core::error::AppResult;
use crate::session::machine::{open_prompt, text_reply, thumbnail_reply};
use crate::session::record::{PendingPrompt, ReplyKind, SessionRecord};
use crate::storage::db::DbPool;
use crate::storage::{self, get_connection, StagedKind, StagingArea};

/// Outcome of a text message checked against the user's pending prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCapture {
    /// The text answered this prompt; the merged record is attached
    Captured(PendingPrompt, SessionRecord),
    /// Not an answer to anything
    Ignored,
}

pub struct SessionManager {
    db_pool: Arc<DbPool>,
    staging: Arc<StagingArea>,
    extension: String,
}

impl SessionManager {
    pub fn new(db_pool: Arc<DbPool>, staging: Arc<StagingArea>, extension: impl Into<String>) -> Self {
        Self {
            db_pool,
            staging,
            extension: extension.into(),
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn current(&self, user_id: i64) -> AppResult<Option<SessionRecord>> {
        let conn = get_connection(&self.db_pool)?;
        storage::get_session(&conn, user_id)
    }

    /// Prompt the user owes us, `Idle` when there is no session.
    pub fn pending_prompt(&self, user_id: i64) -> AppResult<PendingPrompt> {
        Ok(self
            .current(user_id)?
            .map(|record| record.pending_prompt)
            .unwrap_or_default())
    }

    /// Drops the user's session and its staged files.
    pub async fn clear(&self, user_id: i64) -> AppResult<()> {
        let removed = {
            let conn = get_connection(&self.db_pool)?;
            storage::delete_session(&conn, user_id)?
        };
        if let Some(record) = removed {
            self.staging.release_record(&record).await;
            log::debug!("Cleared session for user {}", user_id);
        }
        Ok(())
    }

    /// Starts a fresh session around a just-downloaded document, discarding
    /// whatever the user had before.
    pub async fn start_upload(&self, user_id: i64, original_name: Option<String>, bytes: &[u8]) -> AppResult<SessionRecord> {
        self.clear(user_id).await?;

        let path = self.staging.stage(user_id, StagedKind::Document, bytes).await?;
        let record = SessionRecord::new(user_id, path, original_name);

        let stored = get_connection(&self.db_pool).and_then(|conn| storage::upsert_session(&conn, &record));
        if let Err(e) = stored {
            self.staging.release_record(&record).await;
            return Err(e);
        }

        log::info!(
            "Started session for user {} with {:?} ({} bytes)",
            user_id,
            record.original_name,
            bytes.len()
        );
        Ok(record)
    }

    /// Arms a prompt. Returns `None` when the user has no session to customize.
    pub fn open_prompt(&self, user_id: i64, prompt: PendingPrompt) -> AppResult<Option<SessionRecord>> {
        let conn = get_connection(&self.db_pool)?;
        storage::merge_session(&conn, user_id, &open_prompt(prompt))
    }

    /// Stores a thumbnail reply. Only called when a thumbnail is pending.
    pub async fn set_thumbnail(&self, user_id: i64, bytes: &[u8]) -> AppResult<Option<SessionRecord>> {
        let previous = self.current(user_id)?;
        let Some(previous) = previous.filter(|r| r.pending_prompt.accepts(ReplyKind::Photo)) else {
            return Ok(None);
        };

        let path = self.staging.stage(user_id, StagedKind::Thumbnail, bytes).await?;
        let merged = {
            let conn = get_connection(&self.db_pool)?;
            storage::merge_session(&conn, user_id, &thumbnail_reply(path.clone()))
        };

        match merged {
            Ok(Some(record)) => {
                if let Some(old) = previous.thumbnail_path.as_deref() {
                    self.staging.release([old]).await;
                }
                Ok(Some(record))
            }
            // Session vanished between the read and the write
            Ok(None) => {
                self.staging.release([path.as_path()]).await;
                Ok(None)
            }
            Err(e) => {
                self.staging.release([path.as_path()]).await;
                Err(e)
            }
        }
    }

    /// Routes a plain text message to the pending caption or rename prompt.
    pub fn capture_text(&self, user_id: i64, text: &str) -> AppResult<TextCapture> {
        let conn = get_connection(&self.db_pool)?;
        let Some(record) = storage::get_session(&conn, user_id)? else {
            return Ok(TextCapture::Ignored);
        };
        let prompt = record.pending_prompt;
        let Some(patch) = text_reply(prompt, text, &self.extension) else {
            return Ok(TextCapture::Ignored);
        };

        Ok(match storage::merge_session(&conn, user_id, &patch)? {
            Some(merged) => TextCapture::Captured(prompt, merged),
            None => TextCapture::Ignored,
        })
    }
}
