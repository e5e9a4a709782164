//! Transition rules of the per-user customization flow.
//!
//! Everything here is pure: the handlers feed in the current record and the
//! reply, and persist whatever patch comes out.

use std::path::PathBuf;

use strum::{AsRefStr, Display, EnumString};

use super::record::{PendingPrompt, SessionPatch, SessionRecord};

/// A button offered under the customization menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OfferedAction {
    Thumbnail,
    Caption,
    Rename,
    Download,
}

/// Buttons to show for the given record. Recomputed on every render.
///
/// A metadata prompt is offered only while its field is empty; download is
/// always offered.
pub fn offered_actions(record: Option<&SessionRecord>) -> Vec<OfferedAction> {
    let mut actions = Vec::with_capacity(4);
    if record.map_or(true, |r| r.thumbnail_path.is_none()) {
        actions.push(OfferedAction::Thumbnail);
    }
    if record.map_or(true, |r| r.caption.is_none()) {
        actions.push(OfferedAction::Caption);
    }
    if record.map_or(true, |r| r.file_name.is_none()) {
        actions.push(OfferedAction::Rename);
    }
    actions.push(OfferedAction::Download);
    actions
}

/// Whether an uploaded document qualifies for a session.
pub fn accepts_upload(file_name: Option<&str>, extension: &str) -> bool {
    file_name.is_some_and(|name| name.ends_with(extension))
}

/// Turns the user's rename reply into a file name: trimmed, with the
/// extension appended when missing.
pub fn normalize_rename(text: &str, extension: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with(extension) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, extension)
    }
}

/// Marks `prompt` as the reply the user owes us next.
pub fn open_prompt(prompt: PendingPrompt) -> SessionPatch {
    SessionPatch {
        pending_prompt: Some(prompt),
        ..SessionPatch::default()
    }
}

/// Thumbnail reply: sets only the thumbnail and retires the prompt.
pub fn thumbnail_reply(staged: PathBuf) -> SessionPatch {
    SessionPatch {
        thumbnail_path: Some(staged),
        pending_prompt: Some(PendingPrompt::Idle),
        ..SessionPatch::default()
    }
}

/// Caption reply: stored verbatim, nothing else touched.
pub fn caption_reply(text: &str) -> SessionPatch {
    SessionPatch {
        caption: Some(text.to_string()),
        pending_prompt: Some(PendingPrompt::Idle),
        ..SessionPatch::default()
    }
}

/// Rename reply: normalized name, nothing else touched.
pub fn rename_reply(text: &str, extension: &str) -> SessionPatch {
    SessionPatch {
        file_name: Some(normalize_rename(text, extension)),
        pending_prompt: Some(PendingPrompt::Idle),
        ..SessionPatch::default()
    }
}

/// Builds the patch for a text reply to whatever prompt is pending.
///
/// Returns `None` when the text does not answer a prompt: nothing pending,
/// a photo is expected, or the text is a command.
pub fn text_reply(pending: PendingPrompt, text: &str, extension: &str) -> Option<SessionPatch> {
    if text.starts_with('/') {
        return None;
    }
    match pending {
        PendingPrompt::Caption => Some(caption_reply(text)),
        PendingPrompt::Rename => Some(rename_reply(text, extension)),
        PendingPrompt::Idle | PendingPrompt::Thumbnail => None,
    }
}
