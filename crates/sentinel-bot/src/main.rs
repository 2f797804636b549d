//! Allegro account monitor - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Allegro order and message monitor with Discord notifications.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SENTINEL_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// One-shot OAuth authorization code (overrides ALLEGRO_AUTH_CODE)
    #[arg(long)]
    auth_code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    sentinel_telemetry::init_logging()?;

    info!("Starting allegro-sentinel v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > SENTINEL_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("SENTINEL_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = sentinel_bot::AppConfig::from_file(&config_path)?;

    let mut secrets = sentinel_bot::Secrets::from_env()?;
    if args.auth_code.is_some() {
        secrets.auth_code = args.auth_code;
    }

    let mut app = sentinel_bot::Application::new(config, secrets)?;
    app.run().await?;

    Ok(())
}
