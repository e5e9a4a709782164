//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::dispatch::dispatch;
use super::types::{HandlerDeps, HandlerError, InboundEvent};
use crate::telegram::transport::TelegramTransport;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Both branches turn the update into an [`InboundEvent`] and hand it to
/// [`dispatch`], the same entry point the integration tests drive.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let bot_username = deps.bot_username.clone().unwrap_or_default();
            let Some(event) = InboundEvent::from_message(&msg, &bot_username) else {
                return Ok(());
            };

            let user_id = event.sender().key();
            let transport = TelegramTransport::new(bot);
            if let Err(e) = dispatch(&transport, &deps, event).await {
                log::error!("❌ Message handler failed for user {}: {}", user_id, e);
            }
            Ok(())
        }
    })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let event = InboundEvent::from_callback(&q);
            let user_id = event.sender().key();
            let transport = TelegramTransport::new(bot);
            if let Err(e) = dispatch(&transport, &deps, event).await {
                log::error!("❌ Callback handler failed for user {}: {}", user_id, e);
            }
            Ok(())
        }
    })
}
