//! Routes an [`InboundEvent`] to its handler

use crate::core::error::AppResult;
use crate::telegram::admin;
use crate::telegram::bot::Command;
use crate::telegram::transport::Transport;

use super::types::{HandlerDeps, InboundEvent};
use super::{callbacks, commands, prompts, uploads};

pub async fn dispatch(transport: &dyn Transport, deps: &HandlerDeps, event: InboundEvent) -> AppResult<()> {
    match event {
        InboundEvent::Command {
            sender,
            command,
            reply_to,
            ..
        } => {
            log::info!("🎯 Received command: {:?} from user {}", command, sender.key());
            match command {
                Command::Start => commands::handle_start(transport, deps, &sender).await,
                Command::Help => commands::handle_help(transport, deps, &sender).await,
                Command::Ping => commands::handle_ping(transport, &sender).await,
                Command::Stats => admin::handle_stats(transport, deps, &sender).await,
                Command::Broadcast => admin::handle_broadcast(transport, deps, &sender, reply_to).await,
            }
        }
        InboundEvent::Document {
            sender,
            file_id,
            file_name,
        } => uploads::handle_document(transport, deps, &sender, &file_id, file_name.as_deref()).await,
        InboundEvent::Photo { sender, file_id } => prompts::handle_photo(transport, deps, &sender, &file_id).await,
        InboundEvent::Text { sender, text } => prompts::handle_text(transport, deps, &sender, &text).await,
        InboundEvent::Callback {
            sender,
            callback_id,
            origin,
            action,
        } => callbacks::handle_callback(transport, deps, &sender, &callback_id, origin, action).await,
    }
}
