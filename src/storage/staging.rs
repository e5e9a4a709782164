//! Local staging area for uploaded documents and thumbnails.
//!
//! Files live here only while a session references them.

use std::path::{Path, PathBuf};

use crate::core::error::AppResult;
use crate::session::SessionRecord;

/// What a staged file holds. Becomes part of the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedKind {
    Document,
    Thumbnail,
}

impl StagedKind {
    fn tag(self) -> &'static str {
        match self {
            StagedKind::Document => "doc",
            StagedKind::Thumbnail => "thumb",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes `bytes` under a fresh unique name and returns its path.
    pub async fn stage(&self, user_id: i64, kind: StagedKind, bytes: &[u8]) -> AppResult<PathBuf> {
        self.ensure_dir().await?;
        let path = self
            .root
            .join(format!("{}_{}_{}", user_id, kind.tag(), uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Staged {} bytes for user {} at {}", bytes.len(), user_id, path.display());
        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> AppResult<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    /// Deletes staged files. Files that are already gone are skipped.
    pub async fn release<'a>(&self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => log::debug!("Released staged file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove staged file {}: {}", path.display(), e),
            }
        }
    }

    /// Releases everything a removed session kept alive.
    pub async fn release_record(&self, record: &SessionRecord) {
        self.release(record.staged_paths()).await;
    }
}
