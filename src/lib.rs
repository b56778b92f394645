//! igdl - Instagram media resolver with a streaming download proxy
//!
//! Resolves Instagram post, reel and IGTV links into their media resources and
//! re-serves them through a download proxy that sets attachment headers.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, validation, CORS preview URLs, logging, metrics, web server
//! - `download`: resolver abstraction, Instagram backend, analysis and the download proxy

pub mod cli;
pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use download::{InstagramResolver, ResourceInfo, ResourceResolver, ResourceType};
