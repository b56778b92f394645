//! Logging initialization and startup diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for console and (optionally) file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file; empty string disables file logging
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or install the logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if !log_file_path.trim().is_empty() {
        let log_file =
            File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, Config::default(), log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("igdl configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("WEB_PORT: {}", *config::WEB_PORT);
    log::info!("INSTAGRAM_GRAPHQL_ENDPOINT: {}", config::INSTAGRAM_GRAPHQL_ENDPOINT.as_str());
    log::info!("INSTAGRAM_DOC_ID: {}", config::INSTAGRAM_DOC_ID.as_str());

    match *config::proxy::WARP_PROXY {
        Some(_) => log::info!("WARP_PROXY: configured (Instagram API calls go through the proxy)"),
        None => log::warn!("WARP_PROXY: not set (datacenter IPs are often blocked by Instagram)"),
    }

    if config::LOG_FILE_PATH.trim().is_empty() {
        log::info!("LOG_FILE_PATH: empty, logging to terminal only");
    } else {
        log::info!("LOG_FILE_PATH: {}", config::LOG_FILE_PATH.as_str());
    }
}
