//! Replies to pending prompts: photos for the thumbnail, text for caption
//! and rename

use crate::core::error::AppResult;
use crate::session::{offered_actions, PendingPrompt, ReplyKind, TextCapture};
use crate::telegram::keyboards::options_keyboard;
use crate::telegram::texts;
use crate::telegram::transport::Transport;

use super::types::{HandlerDeps, Sender};

pub async fn handle_photo(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    file_id: &str,
) -> AppResult<()> {
    let pending = deps.sessions.pending_prompt(sender.key())?;
    if !pending.accepts(ReplyKind::Photo) {
        log::debug!("Ignoring photo from user {} (pending: {})", sender.key(), pending);
        return Ok(());
    }

    let bytes = match transport.fetch_file(file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to download thumbnail for user {}: {}", sender.key(), e);
            transport.send_message(sender.chat_id, texts::DOWNLOAD_FAILED, None).await?;
            return Ok(());
        }
    };

    let Some(record) = deps.sessions.set_thumbnail(sender.key(), &bytes).await? else {
        return Ok(());
    };

    transport
        .send_message(
            sender.chat_id,
            texts::THUMBNAIL_SET,
            Some(options_keyboard(&offered_actions(Some(&record)))),
        )
        .await?;
    Ok(())
}

pub async fn handle_text(transport: &dyn Transport, deps: &HandlerDeps, sender: &Sender, text: &str) -> AppResult<()> {
    let (prompt, record) = match deps.sessions.capture_text(sender.key(), text)? {
        TextCapture::Captured(prompt, record) => (prompt, record),
        TextCapture::Ignored => {
            log::debug!("Ignoring text from user {} with no matching prompt", sender.key());
            return Ok(());
        }
    };

    let confirmation = match prompt {
        PendingPrompt::Caption => texts::caption_set(record.caption.as_deref().unwrap_or_default()),
        PendingPrompt::Rename => texts::renamed(record.file_name.as_deref().unwrap_or_default()),
        PendingPrompt::Thumbnail | PendingPrompt::Idle => return Ok(()),
    };

    transport
        .send_message(
            sender.chat_id,
            &confirmation,
            Some(options_keyboard(&offered_actions(Some(&record)))),
        )
        .await?;
    Ok(())
}
