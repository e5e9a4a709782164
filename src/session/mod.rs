//! Per-user customization sessions: the record, its transition rules and
//! the operations that persist them

pub mod machine;
pub mod manager;
pub mod record;

pub use machine::{accepts_upload, normalize_rename, offered_actions, OfferedAction};
pub use manager::{SessionManager, TextCapture};
pub use record::{PendingPrompt, ReplyKind, SessionPatch, SessionRecord};
