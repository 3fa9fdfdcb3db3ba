use anyhow::Result;
use clap::Parser;
use tracing::info;

use echobot::{exchange, ResponseGenerator, Session};

/// Print one chat exchange with the placeholder responder.
#[derive(Parser, Debug)]
#[command(name = "echobot", author, version, about, long_about = None)]
struct Cli {
    #[arg(long, help = "The prompt to get a response for")]
    prompt: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the exchange.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Generating a response for a {}-byte prompt", cli.prompt.len());

    let generator = ResponseGenerator::new();
    let mut session = Session::new();
    let turn = exchange(&mut session, &generator, &cli.prompt);

    println!("{}", turn.to_cli_output());
    Ok(())
}
