//! Guestbook Server
//!
//! Serves the rendered guestbook page and keeps it fresh by re-fetching
//! the message manifest on a fixed interval.
//!
//! # Configuration
//!
//! Loaded from a TOML file (`--config`, or the default search path) with
//! environment variable overrides:
//! - `GUESTBOOK_MANIFEST_BASE_URL`: Base URL for the manifest (default: http://localhost:8090)
//! - `GUESTBOOK_MANIFEST_PATH`: Manifest path (default: messages/manifest.json)
//! - `GUESTBOOK_REFRESH_INTERVAL_SECS`: Refresh interval (default: 300)
//! - `GUESTBOOK_HOST` / `GUESTBOOK_PORT`: Bind address (default: 0.0.0.0:8088)
//! - `RUST_LOG`: Log filter (default: guestbook=info,tower_http=debug)

use clap::Parser;
use guestbook::api::{serve, AppState};
use guestbook::config::Config;
use guestbook::manifest::ManifestLoader;
use guestbook::view::PageView;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "guestbook", version, about = "Guestbook wall server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the server bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the server bind port
    #[arg(long)]
    port: Option<u16>,

    /// Override the manifest base URL
    #[arg(long)]
    manifest_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.manifest_url {
        config.manifest.base_url = url;
    }

    init_tracing(&config);

    tracing::info!("Starting guestbook v{}", env!("CARGO_PKG_VERSION"));

    let loader = Arc::new(ManifestLoader::new(&config.manifest));
    let view = Arc::new(PageView::new());

    tracing::info!("Manifest URL: {}", loader.url());
    tracing::info!(
        "Refresh interval: {}s",
        config.manifest.refresh_interval_secs
    );

    // First cycle fires immediately; the page is ready as soon as it commits
    let refresh_handle = guestbook::refresh::spawn(
        loader,
        Arc::clone(&view),
        Duration::from_secs(config.manifest.refresh_interval_secs),
    );

    serve(AppState::new(view), &config.server).await?;

    refresh_handle.abort();
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "guestbook={},tower_http=debug",
            config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
