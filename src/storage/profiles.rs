//! User profiles: one row per Telegram user who ever pressed /start.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use crate::core::error::AppResult;
use crate::storage::db::DbConnection;

/// A stored user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Set once, on the first /start
    pub first_seen: String,
    pub last_active: String,
}

/// Fields refreshed on every /start.
#[derive(Debug, Clone, Copy)]
pub struct ProfileUpdate<'a> {
    pub user_id: i64,
    pub username: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
}

/// Which profiles to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFilter {
    All,
    /// Profiles whose first_seen falls on this UTC date
    FirstSeenOn(NaiveDate),
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Inserts or refreshes a profile keyed by user id.
///
/// Name fields and last_active are overwritten; first_seen is kept from the
/// first insert. Returns true when the profile did not exist before.
pub fn upsert_profile(conn: &DbConnection, update: &ProfileUpdate<'_>, now: DateTime<Utc>) -> AppResult<bool> {
    let now = timestamp(now);
    let tx = conn.unchecked_transaction()?;

    let inserted = tx.execute(
        "INSERT INTO users (user_id, username, first_name, last_name, first_seen, last_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(user_id) DO NOTHING",
        params![update.user_id, update.username, update.first_name, update.last_name, now],
    )?;

    if inserted == 0 {
        tx.execute(
            "UPDATE users SET username = ?2, first_name = ?3, last_name = ?4, last_active = ?5
             WHERE user_id = ?1",
            params![update.user_id, update.username, update.first_name, update.last_name, now],
        )?;
    }

    tx.commit()?;
    Ok(inserted > 0)
}

pub fn get_profile(conn: &DbConnection, user_id: i64) -> AppResult<Option<UserProfile>> {
    let profile = conn
        .query_row(
            "SELECT user_id, username, first_name, last_name, first_seen, last_active
             FROM users WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserProfile {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    first_seen: row.get(4)?,
                    last_active: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(profile)
}

pub fn count_profiles(conn: &DbConnection, filter: ProfileFilter) -> AppResult<u64> {
    let count: i64 = match filter {
        ProfileFilter::All => conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?,
        ProfileFilter::FirstSeenOn(date) => conn.query_row(
            "SELECT COUNT(*) FROM users WHERE substr(first_seen, 1, 10) = ?1",
            params![date.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )?,
    };
    Ok(count.max(0) as u64)
}

/// Every known user id, oldest first. Broadcast recipients.
pub fn list_profile_ids(conn: &DbConnection) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY first_seen, user_id")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
