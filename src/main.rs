use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

use igdl::cli::{Cli, Commands};
use igdl::core::metrics::init_metrics;
use igdl::core::web_server::{start_web_server, WebState};
use igdl::core::{config, init_logger, log_startup_configuration};
use igdl::download::proxy::build_proxy_client;
use igdl::download::{analyze_link, InstagramResolver, ResourceResolver};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
/// Without a subcommand the web server is started.
///
/// # Errors
/// Returns an error if initialization fails (logging, HTTP clients, binding the port).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load .env before any config value is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Serve { port }) => run_server(port.unwrap_or(*config::WEB_PORT)).await,
        Some(Commands::Analyze { url, json }) => run_cli_analyze(&url, json).await,
        None => {
            log::info!("No command specified, starting web server");
            run_server(*config::WEB_PORT).await
        }
    }
}

/// Run the web server until it fails or the process is stopped.
async fn run_server(port: u16) -> Result<()> {
    log_startup_configuration();
    init_metrics();

    let resolver: Arc<dyn ResourceResolver> = Arc::new(InstagramResolver::new()?);
    let state = WebState::new(resolver, build_proxy_client()?);

    start_web_server(port, state)
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))
}

/// Resolve a link from the command line and print the resources.
async fn run_cli_analyze(url: &str, json: bool) -> Result<()> {
    let resolver = InstagramResolver::new()?;
    let resources = analyze_link(&resolver, Some(url)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(());
    }

    for (i, resource) in resources.iter().enumerate() {
        println!(
            "{:>2}. [{:?}] {} ({}x{})\n    {}",
            i + 1,
            resource.kind(),
            resource.filename(),
            resource.width(),
            resource.height(),
            resource.url()
        );
    }

    Ok(())
}
