use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use setlist_catalog::config::{AppConfig, CliConfig, FileConfig};
use setlist_catalog::ingestion::{HttpFetcher, Ingestor};

#[derive(Parser, Debug)]
struct CliArgs {
    /// URL of the song registry CSV.
    #[clap(long)]
    pub registry_url: Option<String>,

    /// URL of the playlist table CSV.
    #[clap(long)]
    pub playlist_url: Option<String>,

    /// Days after a broadcast date before its audio becomes available.
    #[clap(long, default_value_t = 5)]
    pub embargo_days: i64,

    /// Honor raw audio flags even while the embargo is still running.
    #[clap(long)]
    pub embargo_bypass: bool,

    /// Timeout in seconds for dataset fetches.
    #[clap(long, default_value_t = 30)]
    pub fetch_timeout_sec: u64,

    /// Optional TOML config file. Values present in the file override
    /// the CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Print the ingested snapshot as JSON on stdout.
    #[clap(long)]
    pub dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        registry_url: cli_args.registry_url.clone(),
        playlist_url: cli_args.playlist_url.clone(),
        embargo_days: cli_args.embargo_days,
        embargo_bypass: cli_args.embargo_bypass,
        fetch_timeout_sec: cli_args.fetch_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Fetching datasets from {}...", config.registry_url);
    let fetcher = HttpFetcher::new(config.fetch_timeout_sec);
    let ingestor = Ingestor::new(
        fetcher,
        config.registry_url,
        config.playlist_url,
        config.embargo,
    );
    let snapshot = ingestor.ingest().await.context("Ingestion failed")?;

    info!(
        "Snapshot has:\n{} songs\n{} playlists\n{} statuses, {} languages, {} artists, {} months",
        snapshot.songs.len(),
        snapshot.playlists.len(),
        snapshot.facets.status.len() - 1,
        snapshot.facets.language.len() - 1,
        snapshot.facets.artist.len() - 1,
        snapshot.facets.month.len() - 1,
    );

    if cli_args.dump {
        let json =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{json}");
    }

    Ok(())
}
