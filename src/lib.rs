//! Filetailor - Telegram bot for customizing documents before re-sending them
//!
//! A user uploads a document, attaches a thumbnail, a caption and/or a new
//! file name through inline-button prompts, then downloads the result.
//! Access is gated on membership in a set of required channels.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging and the health endpoint
//! - `storage`: SQLite persistence and the file staging area
//! - `session`: Per-user session records and their transition rules
//! - `telegram`: Bot setup, transport, keyboards and handlers

pub mod cli;
pub mod core;
pub mod session;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, BotSettings};
pub use session::{SessionManager, SessionRecord};
pub use storage::{create_pool, get_connection, DbConnection, DbPool, StagingArea};
pub use telegram::{dispatch, schema, HandlerDeps, InboundEvent, Transport};
