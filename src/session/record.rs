//! Session record and the partial updates applied to it

use std::path::{Path, PathBuf};

use strum::{AsRefStr, Display, EnumString};

/// Which one-shot reply the bot is waiting for from a user.
///
/// Persisted next to the session so a pending prompt survives a restart of
/// the update listener. Only the user owning the record can satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PendingPrompt {
    /// Nothing pending
    #[default]
    Idle,
    /// Next photo becomes the thumbnail
    Thumbnail,
    /// Next plain text becomes the caption
    Caption,
    /// Next plain text becomes the file name
    Rename,
}

/// Shape of an inbound reply that may satisfy a pending prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Photo,
    Text,
}

impl PendingPrompt {
    /// Returns true when a reply of `kind` completes this prompt.
    pub fn accepts(self, kind: ReplyKind) -> bool {
        matches!(
            (self, kind),
            (PendingPrompt::Thumbnail, ReplyKind::Photo)
                | (PendingPrompt::Caption, ReplyKind::Text)
                | (PendingPrompt::Rename, ReplyKind::Text)
        )
    }
}

/// One in-progress file customization. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Telegram ID of the owner
    pub user_id: i64,
    /// Staged copy of the uploaded document
    pub file_path: PathBuf,
    /// Staged thumbnail image, if one was sent
    pub thumbnail_path: Option<PathBuf>,
    /// Caption shown under the delivered document
    pub caption: Option<String>,
    /// Replacement file name (extension already appended)
    pub file_name: Option<String>,
    /// Name of the document as uploaded
    pub original_name: Option<String>,
    pub pending_prompt: PendingPrompt,
}

impl SessionRecord {
    /// A fresh record for a just-staged upload: no metadata, nothing pending.
    pub fn new(user_id: i64, file_path: PathBuf, original_name: Option<String>) -> Self {
        Self {
            user_id,
            file_path,
            thumbnail_path: None,
            caption: None,
            file_name: None,
            original_name,
            pending_prompt: PendingPrompt::Idle,
        }
    }

    /// Every local file this record keeps alive.
    pub fn staged_paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.file_path.as_path()];
        if let Some(thumb) = self.thumbnail_path.as_deref() {
            paths.push(thumb);
        }
        paths
    }

    /// Name the document is delivered under: the replacement name, else the
    /// uploaded name, else `file` with the accepted extension.
    pub fn delivery_name(&self, extension: &str) -> String {
        self.file_name
            .clone()
            .or_else(|| self.original_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("file{}", extension))
    }

    /// Merges a patch into the record. Fields absent from the patch are left
    /// untouched.
    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(ref thumb) = patch.thumbnail_path {
            self.thumbnail_path = Some(thumb.clone());
        }
        if let Some(ref caption) = patch.caption {
            self.caption = Some(caption.clone());
        }
        if let Some(ref name) = patch.file_name {
            self.file_name = Some(name.clone());
        }
        if let Some(prompt) = patch.pending_prompt {
            self.pending_prompt = prompt;
        }
    }
}

/// Partial update of a session. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub thumbnail_path: Option<PathBuf>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    pub pending_prompt: Option<PendingPrompt>,
}
