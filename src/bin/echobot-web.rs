use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use echobot::config::WebConfig;
use echobot::web_server;

/// Serve the chat page over HTTP.
#[derive(Parser, Debug)]
#[command(name = "echobot-web", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    web: WebConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for ECHOBOT_* overrides)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,tower_http=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    info!("echobot-web starting with {:?}", cli.web);

    web_server::start_web_server(&cli.web)
        .await
        .context("echobot-web failed")?;
    Ok(())
}
