//! /start, /help and /ping

use std::time::Instant;

use crate::core::error::AppResult;
use crate::storage::{get_connection, upsert_profile, ProfileUpdate};
use crate::telegram::keyboards::join_keyboard;
use crate::telegram::membership::is_member;
use crate::telegram::notifications::{new_user_entry, notify_log_channel};
use crate::telegram::texts;
use crate::telegram::transport::Transport;

use super::types::{HandlerDeps, Sender};

/// Records the profile, announces first-time users, then greets members or
/// asks non-members to join.
pub async fn handle_start(transport: &dyn Transport, deps: &HandlerDeps, sender: &Sender) -> AppResult<()> {
    let created = {
        let conn = get_connection(&deps.db_pool)?;
        upsert_profile(
            &conn,
            &ProfileUpdate {
                user_id: sender.key(),
                username: sender.username.as_deref(),
                first_name: &sender.first_name,
                last_name: sender.last_name.as_deref(),
            },
            chrono::Utc::now(),
        )?
    };

    if created {
        log::info!("New user {} ({})", sender.key(), sender.first_name);
        let entry = new_user_entry(
            sender.key(),
            &sender.first_name,
            sender.last_name.as_deref(),
            sender.username.as_deref(),
        );
        notify_log_channel(transport, &deps.settings, &entry).await;
    }

    let settings = &deps.settings;
    if is_member(transport, &settings.required_channels, sender.user_id).await {
        transport
            .send_message(
                sender.chat_id,
                &texts::welcome(&sender.first_name, &settings.file_extension),
                None,
            )
            .await?;
        deps.sessions.clear(sender.key()).await?;
    } else {
        transport
            .send_message(
                sender.chat_id,
                texts::JOIN_REQUIRED,
                Some(join_keyboard(&settings.required_channels)),
            )
            .await?;
    }
    Ok(())
}

pub async fn handle_help(transport: &dyn Transport, deps: &HandlerDeps, sender: &Sender) -> AppResult<()> {
    transport
        .send_message(sender.chat_id, &texts::help(&deps.settings.file_extension), None)
        .await?;
    Ok(())
}

/// Measures how long sending "Pong!" takes and edits the figure in.
pub async fn handle_ping(transport: &dyn Transport, sender: &Sender) -> AppResult<()> {
    let started = Instant::now();
    let message_id = transport.send_message(sender.chat_id, texts::PONG, None).await?;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    transport
        .edit_message(sender.chat_id, message_id, &texts::pong(latency_ms), None)
        .await?;
    Ok(())
}
