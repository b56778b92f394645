//! Core utilities, configuration, and common functionality

pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod validation;
pub mod web_server;

// Re-exports for convenience
pub use config::*;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_startup_configuration};
