//! Telegram bot handler tree configuration
//!
//! Updates are converted into [`InboundEvent`]s and routed by [`dispatch`].
//! The dptree schema used in production is a thin shell around it, so
//! integration tests drive the same code path with a mock transport.

mod callbacks;
mod commands;
mod dispatch;
mod prompts;
mod schema;
mod types;
mod uploads;

pub use dispatch::dispatch;
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError, InboundEvent, Sender};
