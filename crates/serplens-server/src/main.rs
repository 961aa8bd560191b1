use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serplens_core::Analyzer;
use serplens_core::config::{API_KEY_ENV, Settings, SettingsArgs};
use serplens_server::{HttpConfig, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "serplens-server")]
#[command(about = "HTTP API comparing a page against the top search results for a keyword")]
#[command(version)]
struct Cli {
    /// Listen address
    #[arg(short, long, env = "SERPLENS_LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    listen: String,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "SERPLENS_CORS", default_value_t = true, action = clap::ArgAction::Set)]
    cors: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from(cli.settings);

    if !settings.has_api_key() {
        warn!("{API_KEY_ENV} is not set; /analyze-serp will answer 500 until it is configured");
    }

    let analyzer = Analyzer::new(settings).context("failed to build analyzer")?;
    let config = HttpConfig {
        listen_addr: cli.listen,
        cors_enabled: cli.cors,
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        max_competitors = analyzer.settings().search.max_competitors,
        "starting serplens-server"
    );
    HttpServer::new(config, Arc::new(analyzer))
        .run(shutdown_signal())
        .await
}
