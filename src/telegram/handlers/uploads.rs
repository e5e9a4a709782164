//! Document uploads: the entry point of every customization session

use crate::core::error::AppResult;
use crate::session::{accepts_upload, offered_actions};
use crate::telegram::keyboards::{join_keyboard, options_keyboard};
use crate::telegram::membership::is_member;
use crate::telegram::texts;
use crate::telegram::transport::Transport;

use super::types::{HandlerDeps, Sender};

/// Gate, extension check, download, then a fresh session and the options menu.
///
/// A rejected upload leaves any existing session untouched.
pub async fn handle_document(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    file_id: &str,
    file_name: Option<&str>,
) -> AppResult<()> {
    let settings = &deps.settings;

    if !is_member(transport, &settings.required_channels, sender.user_id).await {
        transport
            .send_message(
                sender.chat_id,
                texts::JOIN_FIRST,
                Some(join_keyboard(&settings.required_channels)),
            )
            .await?;
        return Ok(());
    }

    if !accepts_upload(file_name, &settings.file_extension) {
        log::debug!("Rejected upload {:?} from user {}", file_name, sender.key());
        transport
            .send_message(sender.chat_id, &texts::wrong_extension(&settings.file_extension), None)
            .await?;
        return Ok(());
    }

    let bytes = match transport.fetch_file(file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to download document for user {}: {}", sender.key(), e);
            transport.send_message(sender.chat_id, texts::DOWNLOAD_FAILED, None).await?;
            return Ok(());
        }
    };

    let record = deps
        .sessions
        .start_upload(sender.key(), file_name.map(str::to_string), &bytes)
        .await?;

    transport
        .send_message(
            sender.chat_id,
            texts::UPLOAD_ACCEPTED,
            Some(options_keyboard(&offered_actions(Some(&record)))),
        )
        .await?;
    Ok(())
}
