use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tentador_core::{load_config_or_default, BrowserSession};

/// Single-episode manifest extraction, run as a child of the orchestrator.
///
/// Prints exactly one JSON result object on stdout; all logging goes to
/// stderr so the parent can parse the output.
#[derive(Parser)]
#[command(name = "tentador-extract", version, about)]
struct Args {
    /// Episode page to observe.
    url: String,

    /// The decryption key is already on file; suppress capture guidance.
    #[arg(long)]
    skip_key: bool,

    /// Configuration file for session settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Extraction failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .or_else(|| std::env::var("TENTADOR_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    if !args.skip_key {
        info!("No decryption key on file for this episode, capture it during this session");
    }

    let session = BrowserSession::new(config.extraction.clone());
    let result = session
        .run(&args.url)
        .await
        .context("Browser session failed")?;

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
