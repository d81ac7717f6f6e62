//! Campaign analytics proxy entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use instantly_analytics_proxy::api::{create_router, AppState};
use instantly_analytics_proxy::config::{Config, CAMPAIGN_LIMIT, INSTANTLY_BASE_URL, PORT};
use instantly_analytics_proxy::instantly::{AnalyticsWindow, InstantlyClient};
use instantly_analytics_proxy::metrics;
use instantly_analytics_proxy::utils::shutdown_signal;
use instantly_analytics_proxy::ProxyError;

/// Campaign analytics proxy for the Instantly API.
#[derive(Parser, Debug)]
#[command(name = "instantly-analytics-proxy")]
#[command(about = "Health and campaign analytics endpoints in front of the Instantly API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration (reads .env first)
    let config = Config::load()?;

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("instantly_analytics_proxy=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (json_layer, text_layer) = if args.log_json {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ANALYTICS PROXY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    let window = AnalyticsWindow::DEFAULT;

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Data Source: {}", config.data_source());
    println!(
        "  API Key: {}",
        if config.api_key().is_empty() { "missing" } else { "present" }
    );
    println!("  Upstream: {}", INSTANTLY_BASE_URL);
    println!("  Campaign Limit: {}", CAMPAIGN_LIMIT);
    println!("  Window: {} .. {}", window.start_param(), window.end_param());
    println!("  Port: {}", PORT);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(ProxyError::InvalidConfig(e).into());
    }

    info!("Configuration loaded successfully");
    info!("Data source: {}", config.data_source());

    let client = InstantlyClient::new(config.api_key()).map_err(ProxyError::from)?;
    let metrics_enabled = config.metrics_enabled;
    let mut app_state = AppState::new(config, client);

    if metrics_enabled {
        let handle = metrics::install_recorder().map_err(ProxyError::from)?;
        app_state = app_state.with_metrics(handle);
        info!("Metrics available at /metrics");
    }

    let router = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    let listener = TcpListener::bind(addr).await.map_err(ProxyError::from)?;
    info!("Server running on http://localhost:{}", PORT);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ProxyError::from)?;

    info!("Server stopped");
    Ok(())
}
