//! Queue Console - Main Entry Point
//! Interactive control panel for a simulated message-queue consumer

mod logging;
mod render;
mod settings;
mod surface;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use queue_console_core::application::constants::RUNTIME_SHUTDOWN_TIMEOUT;
use queue_console_core::application::{PanelRuntime, PanelService};
use queue_console_core::port::time_provider::SystemTimeProvider;
use queue_console_infra_system::{RandomTokenProvider, TokioTimerScheduler};

use settings::ConsoleSettings;
use surface::{Flow, Surface};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "queue> ";

#[derive(Parser, Debug)]
#[command(name = "queue-console")]
#[command(about = "Control panel for a simulated message-queue consumer", long_about = None)]
#[command(version)]
struct Args {
    /// Settings file (TOML); defaults to ~/.queue-console/settings.toml
    #[arg(long, env = "QUEUE_CONSOLE_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Settings, then logging (the guard must outlive the runtime)
    let settings = ConsoleSettings::load(args.settings.as_deref())
        .context("Failed to load console settings")?;
    let _log_guard = logging::init(&settings).context("Failed to initialize logging")?;

    info!(
        version = VERSION,
        connect_delay_ms = settings.connect_delay_ms,
        consume_interval_ms = settings.consume_interval_ms,
        "Queue Console starting"
    );

    // 2. Wiring
    let (scheduler, fired) = TokioTimerScheduler::new();
    let service = PanelService::new(
        settings.timings(),
        Arc::new(SystemTimeProvider),
        Arc::new(RandomTokenProvider::new(settings.token_length)),
        Arc::new(scheduler),
    );
    let (handle, runtime_task) = PanelRuntime::spawn(service, fired);
    let mut updates = handle.subscribe();

    // 3. Interactive loop
    let mut surface = Surface::new(handle.clone(), std::io::stdout());
    surface.banner()?;
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    info!("Input closed");
                    break;
                };
                if surface.handle_line(&line).await? == Flow::Quit {
                    break;
                }
                prompt()?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Panel runtime stopped unexpectedly");
                    break;
                }
                surface.print_updates()?;
            }
            _ = &mut ctrl_c => {
                info!("Interrupt received");
                break;
            }
        }
    }

    // 4. Graceful shutdown: cancel timers, let the runtime drain
    handle.shutdown();
    match tokio::time::timeout(RUNTIME_SHUTDOWN_TIMEOUT, runtime_task).await {
        Ok(Ok(Ok(()))) => info!("Shutdown complete"),
        Ok(Ok(Err(e))) => warn!(error = %e, "Panel runtime failed"),
        Ok(Err(e)) => warn!(error = %e, "Panel runtime task panicked"),
        Err(_) => warn!("Panel runtime did not stop in time"),
    }

    Ok(())
}

fn prompt() -> Result<()> {
    let mut out = std::io::stdout();
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    Ok(())
}
