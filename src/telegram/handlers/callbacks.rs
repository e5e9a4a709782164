//! Inline button presses: verify, the three prompts and download

use teloxide::types::{ChatId, MessageId};

use crate::core::error::AppResult;
use crate::session::{PendingPrompt, SessionRecord};
use crate::telegram::keyboards::CallbackAction;
use crate::telegram::membership::is_member;
use crate::telegram::texts;
use crate::telegram::transport::{DocumentDelivery, Transport};

use super::types::{HandlerDeps, Sender};

pub async fn handle_callback(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    callback_id: &str,
    origin: Option<(ChatId, MessageId)>,
    action: Option<CallbackAction>,
) -> AppResult<()> {
    let Some(action) = action else {
        log::debug!("Unknown callback data from user {}", sender.key());
        transport.answer_callback(callback_id, None, false).await?;
        return Ok(());
    };

    log::info!("Callback {} from user {}", action, sender.key());
    match action {
        CallbackAction::Verify => handle_verify(transport, deps, sender, callback_id, origin).await,
        CallbackAction::Thumbnail => {
            open_prompt(transport, deps, sender, callback_id, origin, PendingPrompt::Thumbnail).await
        }
        CallbackAction::Caption => {
            open_prompt(transport, deps, sender, callback_id, origin, PendingPrompt::Caption).await
        }
        CallbackAction::Rename => open_prompt(transport, deps, sender, callback_id, origin, PendingPrompt::Rename).await,
        CallbackAction::Download => handle_download(transport, deps, sender, callback_id).await,
    }
}

/// Edits the button's message, or sends a new one when it is gone.
async fn replace_origin(
    transport: &dyn Transport,
    sender: &Sender,
    origin: Option<(ChatId, MessageId)>,
    text: &str,
) -> AppResult<()> {
    match origin {
        Some((chat_id, message_id)) => transport.edit_message(chat_id, message_id, text, None).await,
        None => transport.send_message(sender.chat_id, text, None).await.map(|_| ()),
    }
}

async fn handle_verify(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    callback_id: &str,
    origin: Option<(ChatId, MessageId)>,
) -> AppResult<()> {
    let settings = &deps.settings;
    if !is_member(transport, &settings.required_channels, sender.user_id).await {
        transport
            .answer_callback(callback_id, Some(texts::JOIN_ALL_ALERT), true)
            .await?;
        return Ok(());
    }

    replace_origin(
        transport,
        sender,
        origin,
        &texts::verified(&sender.first_name, &settings.file_extension),
    )
    .await?;
    deps.sessions.clear(sender.key()).await?;
    transport.answer_callback(callback_id, None, false).await?;
    Ok(())
}

/// Arms `prompt` for this user and turns the menu into the prompt text.
async fn open_prompt(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    callback_id: &str,
    origin: Option<(ChatId, MessageId)>,
    prompt: PendingPrompt,
) -> AppResult<()> {
    if deps.sessions.open_prompt(sender.key(), prompt)?.is_none() {
        transport
            .answer_callback(callback_id, Some(texts::SEND_FILE_FIRST), true)
            .await?;
        return Ok(());
    }

    let text = match prompt {
        PendingPrompt::Thumbnail => texts::THUMBNAIL_PROMPT.to_string(),
        PendingPrompt::Caption => texts::CAPTION_PROMPT.to_string(),
        PendingPrompt::Rename => texts::rename_prompt(deps.sessions.extension()),
        PendingPrompt::Idle => return Ok(()),
    };

    replace_origin(transport, sender, origin, &text).await?;
    transport.answer_callback(callback_id, None, false).await?;
    Ok(())
}

/// Sends the customized document. The session stays so the user can
/// download again.
async fn handle_download(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    callback_id: &str,
) -> AppResult<()> {
    let Some(record) = deps.sessions.current(sender.key())? else {
        transport
            .answer_callback(callback_id, Some(texts::NO_FILE_FOUND), true)
            .await?;
        return Ok(());
    };

    match deliver(transport, deps, sender.chat_id, &record).await {
        Ok(()) => {
            log::info!("Delivered {} to user {}", record.delivery_name(deps.sessions.extension()), sender.key());
            transport
                .answer_callback(callback_id, Some(texts::FILE_SENT), false)
                .await?;
        }
        Err(e) => {
            log::error!("Failed to deliver file to user {}: {}", sender.key(), e);
            transport
                .answer_callback(callback_id, Some(&texts::delivery_failed(&e.to_string())), true)
                .await?;
        }
    }
    Ok(())
}

async fn deliver(transport: &dyn Transport, deps: &HandlerDeps, chat_id: ChatId, record: &SessionRecord) -> AppResult<()> {
    let staging = deps.sessions.staging();
    let bytes = staging.read(&record.file_path).await?;

    let thumbnail = match record.thumbnail_path.as_deref() {
        Some(path) => match staging.read(path).await {
            Ok(thumb) => Some(thumb),
            Err(e) => {
                log::warn!("Thumbnail {} unavailable, sending without it: {}", path.display(), e);
                None
            }
        },
        None => None,
    };

    let delivery = DocumentDelivery {
        file_name: record.delivery_name(deps.sessions.extension()),
        bytes,
        caption: record.caption.clone(),
        thumbnail,
    };
    transport.send_document(chat_id, delivery).await
}
