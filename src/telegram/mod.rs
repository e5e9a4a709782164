//! Telegram bot integration and handlers

pub mod admin;
pub mod bot;
pub mod handlers;
pub mod keyboards;
pub mod membership;
pub mod notifications;
pub mod texts;
pub mod transport;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{dispatch, schema, HandlerDeps, HandlerError, InboundEvent, Sender};
pub use keyboards::CallbackAction;
pub use transport::{DocumentDelivery, MemberStatus, TelegramTransport, Transport};
