//! Administrator commands: /stats and /broadcast

use chrono::Utc;
use teloxide::types::{ChatId, MessageId};

use crate::core::error::AppResult;
use crate::storage::{count_profiles, count_sessions, get_connection, list_profile_ids, ProfileFilter};
use crate::telegram::handlers::{HandlerDeps, Sender};
use crate::telegram::notifications::{broadcast_entry, notify_log_channel};
use crate::telegram::texts;
use crate::telegram::transport::Transport;

/// Outcome of a broadcast run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub success: usize,
    pub failed: usize,
}

/// Replies with the rejection and returns false for anyone but the admin.
async fn ensure_admin(transport: &dyn Transport, deps: &HandlerDeps, sender: &Sender) -> AppResult<bool> {
    if deps.settings.is_admin(sender.key()) {
        return Ok(true);
    }
    log::warn!("User {} tried an admin command", sender.key());
    transport.send_message(sender.chat_id, texts::NOT_AUTHORIZED, None).await?;
    Ok(false)
}

pub async fn handle_stats(transport: &dyn Transport, deps: &HandlerDeps, sender: &Sender) -> AppResult<()> {
    if !ensure_admin(transport, deps, sender).await? {
        return Ok(());
    }

    let (total, today, sessions) = {
        let conn = get_connection(&deps.db_pool)?;
        (
            count_profiles(&conn, ProfileFilter::All)?,
            count_profiles(&conn, ProfileFilter::FirstSeenOn(Utc::now().date_naive()))?,
            count_sessions(&conn)?,
        )
    };

    let text = texts::stats(total, today, sessions, deps.settings.log_channel_link.as_deref());
    transport.send_message(sender.chat_id, &text, None).await?;
    Ok(())
}

/// Copies one message to every recipient. Failures are counted, never
/// retried, and never stop the loop.
pub async fn broadcast_copy(
    transport: &dyn Transport,
    recipients: &[i64],
    from: ChatId,
    message_id: MessageId,
) -> BroadcastSummary {
    let mut summary = BroadcastSummary::default();
    for &recipient in recipients {
        match transport.copy_message(ChatId(recipient), from, message_id).await {
            Ok(()) => summary.success += 1,
            Err(e) => {
                log::debug!("Broadcast to {} failed: {}", recipient, e);
                summary.failed += 1;
            }
        }
    }
    summary
}

pub async fn handle_broadcast(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    sender: &Sender,
    reply_to: Option<MessageId>,
) -> AppResult<()> {
    if !ensure_admin(transport, deps, sender).await? {
        return Ok(());
    }

    let Some(message_id) = reply_to else {
        transport.send_message(sender.chat_id, texts::BROADCAST_USAGE, None).await?;
        return Ok(());
    };

    let recipients = {
        let conn = get_connection(&deps.db_pool)?;
        list_profile_ids(&conn)?
    };

    log::info!("Broadcast by {} to {} users", sender.key(), recipients.len());
    let progress = transport
        .send_message(sender.chat_id, &texts::broadcast_started(recipients.len()), None)
        .await?;

    let summary = broadcast_copy(transport, &recipients, sender.chat_id, message_id).await;
    log::info!("Broadcast finished: {} sent, {} failed", summary.success, summary.failed);

    transport
        .edit_message(
            sender.chat_id,
            progress,
            &texts::broadcast_finished(summary.success, summary.failed),
            None,
        )
        .await?;

    let entry = broadcast_entry(&sender.first_name, sender.key(), summary.success, summary.failed, Utc::now());
    notify_log_channel(transport, &deps.settings, &entry).await;
    Ok(())
}
