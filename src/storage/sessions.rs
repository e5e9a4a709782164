//! Session records, at most one per user.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::AppResult;
use crate::session::{PendingPrompt, SessionPatch, SessionRecord};
use crate::storage::db::DbConnection;

const SESSION_COLUMNS: &str =
    "user_id, file_path, thumbnail_path, caption, file_name, original_name, pending_prompt";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn path_to_text(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let prompt: String = row.get(6)?;
    let pending_prompt = PendingPrompt::from_str(&prompt).unwrap_or_else(|_| {
        log::warn!("Unknown pending prompt '{}' in storage, treating as idle", prompt);
        PendingPrompt::Idle
    });

    Ok(SessionRecord {
        user_id: row.get(0)?,
        file_path: PathBuf::from(row.get::<_, String>(1)?),
        thumbnail_path: row.get::<_, Option<String>>(2)?.map(PathBuf::from),
        caption: row.get(3)?,
        file_name: row.get(4)?,
        original_name: row.get(5)?,
        pending_prompt,
    })
}

pub fn get_session(conn: &DbConnection, user_id: i64) -> AppResult<Option<SessionRecord>> {
    let sql = format!("SELECT {} FROM user_sessions WHERE user_id = ?1", SESSION_COLUMNS);
    let record = conn.query_row(&sql, params![user_id], row_to_session).optional()?;
    Ok(record)
}

/// Writes the whole record, replacing any previous one for the same user.
pub fn upsert_session(conn: &DbConnection, record: &SessionRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO user_sessions
            (user_id, file_path, thumbnail_path, caption, file_name, original_name, pending_prompt, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(user_id) DO UPDATE SET
            file_path = excluded.file_path,
            thumbnail_path = excluded.thumbnail_path,
            caption = excluded.caption,
            file_name = excluded.file_name,
            original_name = excluded.original_name,
            pending_prompt = excluded.pending_prompt,
            updated_at = excluded.updated_at",
        params![
            record.user_id,
            path_to_text(&record.file_path),
            record.thumbnail_path.as_deref().map(path_to_text),
            record.caption,
            record.file_name,
            record.original_name,
            record.pending_prompt.as_ref(),
            now(),
        ],
    )?;
    Ok(())
}

/// Merges a patch into the user's record in one transaction.
///
/// Returns the merged record, or `None` when the user has no session (a
/// patch never creates one).
pub fn merge_session(conn: &DbConnection, user_id: i64, patch: &SessionPatch) -> AppResult<Option<SessionRecord>> {
    let tx = conn.unchecked_transaction()?;

    let sql = format!("SELECT {} FROM user_sessions WHERE user_id = ?1", SESSION_COLUMNS);
    let Some(mut record) = tx.query_row(&sql, params![user_id], row_to_session).optional()? else {
        return Ok(None);
    };
    record.apply(patch);

    tx.execute(
        "UPDATE user_sessions
         SET thumbnail_path = ?2, caption = ?3, file_name = ?4, pending_prompt = ?5, updated_at = ?6
         WHERE user_id = ?1",
        params![
            user_id,
            record.thumbnail_path.as_deref().map(path_to_text),
            record.caption,
            record.file_name,
            record.pending_prompt.as_ref(),
            now(),
        ],
    )?;
    tx.commit()?;

    Ok(Some(record))
}

/// Removes the user's record and hands it back so its staged files can be
/// released. Deleting a missing record is not an error.
pub fn delete_session(conn: &DbConnection, user_id: i64) -> AppResult<Option<SessionRecord>> {
    let tx = conn.unchecked_transaction()?;
    let sql = format!("SELECT {} FROM user_sessions WHERE user_id = ?1", SESSION_COLUMNS);
    let record = tx.query_row(&sql, params![user_id], row_to_session).optional()?;
    if record.is_some() {
        tx.execute("DELETE FROM user_sessions WHERE user_id = ?1", params![user_id])?;
    }
    tx.commit()?;
    Ok(record)
}

pub fn count_sessions(conn: &DbConnection) -> AppResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM user_sessions", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}
