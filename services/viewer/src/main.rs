//! Weather radar viewer service.
//!
//! Animates through recent radar frames from a WMS time dimension:
//! - Polls GetCapabilities on a fixed interval
//! - Resolves the layer's time dimension to a trailing-window frame list
//! - Advances a playback cursor on a timer, with keyboard control
//! - Exposes playback state over an HTTP status API

mod config;
mod coordinator;
mod keys;
mod layer;
mod playback;
mod server;
mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ViewerConfig;
use coordinator::{Coordinator, ViewerCommand};
use keys::command_for_key;
use settings::LayerSettings;

#[derive(Parser, Debug)]
#[command(name = "radar-viewer")]
#[command(about = "Headless weather radar animation viewer")]
struct Args {
    /// WMS GetCapabilities endpoint to poll
    #[arg(
        long,
        env = "CAPABILITIES_URL",
        default_value = "https://openwms.fmi.fi/geoserver/wms?service=WMS&request=GetCapabilities"
    )]
    capabilities_url: String,

    /// Base WMS URL for the radar image layer
    #[arg(long, env = "WMS_URL", default_value = "https://openwms.fmi.fi/geoserver/wms")]
    wms_url: String,

    /// Radar layer name (exact, case-sensitive)
    #[arg(long, env = "RADAR_LAYER", default_value = "Radar:suomi_dbz_eureffin")]
    layer: String,

    /// Seconds between capabilities refreshes
    #[arg(long, default_value = "60")]
    refresh_interval_secs: u64,

    /// Capabilities fetch timeout in seconds
    #[arg(long, default_value = "30")]
    fetch_timeout_secs: u64,

    /// Directory for persisted settings
    #[arg(long, env = "STATE_DIR", default_value = "/data/radar-viewer")]
    state_dir: PathBuf,

    /// Port for the status HTTP server
    #[arg(long, env = "STATUS_PORT", default_value = "8082")]
    status_port: u16,

    /// Disable the status HTTP server
    #[arg(long)]
    no_status_server: bool,

    /// Resolve the timeline once, print it, and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(layer = %args.layer, "Starting radar viewer");

    tokio::fs::create_dir_all(&args.state_dir).await?;

    let config = ViewerConfig {
        capabilities_url: args.capabilities_url,
        wms_url: args.wms_url,
        layer: args.layer,
        refresh_interval: Duration::from_secs(args.refresh_interval_secs),
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        state_dir: args.state_dir.clone(),
    };

    let settings = LayerSettings::load(&args.state_dir);
    let (mut coordinator, status_rx) = Coordinator::new(config, settings)?;

    if args.once {
        // Single resolution mode: print the timeline and exit
        coordinator.refresh().await?;
        let snapshot = coordinator.snapshot();
        for time in &snapshot.frames {
            println!("{}", time);
        }
        return Ok(());
    }

    // Shutdown signal
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Handle Ctrl+C
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown_tx_clone.send(()).ok();
    });

    let (command_tx, command_rx) = mpsc::channel::<ViewerCommand>(16);

    // Start status server
    if !args.no_status_server {
        let status_rx = status_rx.clone();
        let command_tx = command_tx.clone();
        let status_port = args.status_port;
        tokio::spawn(async move {
            if let Err(e) = server::run_server(status_rx, command_tx, status_port).await {
                tracing::error!(error = %e, "Status server failed");
            }
        });
    }

    // Keyboard commands from stdin
    spawn_key_reader(command_tx);

    info!("Type ? then Enter for keyboard help");

    coordinator.run(command_rx, shutdown_tx.subscribe()).await?;

    info!("Viewer stopped");
    Ok(())
}

/// Read keys from stdin (line-buffered) and forward mapped commands.
fn spawn_key_reader(tx: mpsc::Sender<ViewerCommand>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for key in line.chars() {
                if let Some(cmd) = command_for_key(key) {
                    if tx.send(ViewerCommand::Key(cmd)).await.is_err() {
                        return;
                    }
                }
            }
        }
    });
}
