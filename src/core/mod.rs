//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod health_server;
pub mod logging;

// Re-exports for convenience
pub use config::BotSettings;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_startup_configuration};
