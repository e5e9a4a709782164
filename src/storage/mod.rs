//! Database, profile and session persistence, plus the file staging area

pub mod db;
pub mod migrations;
pub mod profiles;
pub mod sessions;
pub mod staging;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use profiles::{count_profiles, get_profile, list_profile_ids, upsert_profile, ProfileFilter, ProfileUpdate, UserProfile};
pub use sessions::{count_sessions, delete_session, get_session, merge_session, upsert_session};
pub use staging::{StagedKind, StagingArea};
