use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use soilmap::server::{start_server, AppState};
use soilmap::Settings;

/// Soil composition heat map server
#[derive(Parser, Debug)]
#[command(name = "soilmap")]
#[command(about = "Serve a map page that shows SOC stock, sand and clay estimates for a polygon")]
struct Args {
    /// Config file (defaults to soilmap.ini next to the executable)
    #[arg(short, long, env = "SOILMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🗺️  SoilMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load().context("Failed to load settings")?,
    };
    if let Some(port) = args.port {
        settings.port = port;
    }

    match &settings.sand_url {
        Some(url) => tracing::info!("   Sand upstream: {}", url),
        None => tracing::warn!("⚠️  SAND_URL not set - sand requests will fail"),
    }
    match &settings.root_url {
        Some(url) => tracing::info!("   Backend root: {}", url),
        None => tracing::warn!("⚠️  ROOT_URL not set - SOC stock and clay requests will fail"),
    }

    start_server(AppState::new(settings)).await
}
