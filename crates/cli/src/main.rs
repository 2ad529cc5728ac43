use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tentador_core::{
    load_config_or_default, validate_config, CommandDiscovery, CommandFetcher, DiscoveryCache,
    EpisodePipeline, FfmpegDecryptor, KeyResolver, KeyStore, Library, ManualCapture, Orchestrator,
    StdinPrompt, StreamDecryptor, SubprocessExtractor,
};

/// Batch episode acquisition for a DRM-protected web catalog.
#[derive(Parser)]
#[command(name = "tentador", version, about)]
struct Args {
    /// Configuration file. Falls back to $TENTADOR_CONFIG, then config.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .or_else(|| std::env::var("TENTADOR_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        series = %config.series.name,
        season = config.series.season,
        library = %config.library.dir.display(),
        "Configuration loaded"
    );

    let discovery = Arc::new(CommandDiscovery::new(
        config.discovery.clone(),
        config.series.url.clone(),
    ));
    let cache = DiscoveryCache::new(&config.paths.cache_file);

    let resolver = KeyResolver::new(
        KeyStore::new(&config.paths.keys_file),
        ManualCapture::new(config.resolver.clone(), Arc::new(StdinPrompt)),
    );

    // The child session rereads the same config file; only pass it along
    // when it actually exists.
    let child_config = config_path.exists().then(|| config_path.clone());
    let extractor = Arc::new(SubprocessExtractor::from_config(
        &config.extraction,
        child_config,
    ));

    let fetcher = Arc::new(CommandFetcher::new(config.fetcher.clone()));
    fetcher
        .validate()
        .await
        .context("Stream fetch tool is not available")?;

    let decryptor = Arc::new(FfmpegDecryptor::new(config.decryptor.clone()));
    decryptor.validate().await.context("ffmpeg is not available")?;

    let library = Arc::new(Library::new(config.library.clone()));
    let pipeline = EpisodePipeline::new(
        fetcher,
        decryptor,
        library.clone(),
        config.paths.downloads.clone(),
        config.paths.temp.clone(),
    );

    let orchestrator = Orchestrator::new(
        config.orchestrator.clone(),
        config.series.clone(),
        discovery,
        cache,
        KeyStore::new(&config.paths.keys_file),
        resolver,
        extractor,
        pipeline,
        library,
        config.paths.downloads.clone(),
    );

    let report = orchestrator.run().await.context("Batch run failed")?;
    if report.failed() > 0 {
        warn!(failed = report.failed(), "Some episodes failed this run");
    }
    Ok(())
}
