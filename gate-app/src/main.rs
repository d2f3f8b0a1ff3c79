//! Gate demo host.
//!
//! Runs the unlock-gate engine against a terminal surface: engagement
//! actions are typed as console commands, visuals are printed lines, and
//! external links are logged instead of opened.

mod bootstrap;
mod config;
mod console;
mod shutdown;
mod surface;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use gate_core::storage::{ExpiringStore, JsonFileBackend};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::surface::{ConsoleLinkOpener, TerminalSurface};

/// Gate - a multi-step unlock flow, in your terminal
#[derive(Parser, Debug)]
#[command(name = "gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./gate-config.toml")]
    config: PathBuf,

    /// Pretend every new-tab request is popup-blocked, to exercise the
    /// same-context fallback
    #[arg(long, default_value = "false")]
    simulate_popup_block: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    tracing::info!("Starting gate v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load(&args.config)?;

    let surface = Arc::new(TerminalSurface::new(&config.stats));
    let opener = Arc::new(ConsoleLinkOpener::new(args.simulate_popup_block));

    let cache = match &config.storage.path {
        Some(path) => {
            let backend = JsonFileBackend::open(path).await.map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to open storage");
                anyhow::anyhow!(e)
            })?;
            Some(ExpiringStore::new(backend))
        }
        None => None,
    };

    let handles = bootstrap::wire(surface, opener, &config);

    // Drive the console until the user quits or a signal arrives.
    tokio::select! {
        _ = shutdown::shutdown_signal() => {}
        result = console::run(&handles, cache.as_ref()) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "console loop failed");
            }
        }
    }

    handles.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
