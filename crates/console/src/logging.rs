//! Diagnostic logging setup
//!
//! The control surface owns stdout, so diagnostics go to stderr or, when
//! `log_dir` is set, to a daily rolling file.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (overrides the defaults below)
//! - `QUEUE_CONSOLE_LOG_FORMAT`: `pretty` (default) or `json`

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::{ConsoleSettings, LogFormat};

const LOG_FILE_PREFIX: &str = "queue-console.log";

// Interactive sessions share the terminal with stderr; keep it quiet there
const TERMINAL_FILTER: &str = "warn";
const FILE_FILTER: &str =
    "warn,queue_console=info,queue_console_core=info,queue_console_infra_system=info";

/// Install the global subscriber
///
/// Keep the returned guard alive for the whole process, otherwise buffered
/// file output is lost.
pub fn init(settings: &ConsoleSettings) -> Result<Option<WorkerGuard>> {
    let (writer, guard, default_filter) = match &settings.log_dir {
        Some(dir) => {
            let appender =
                tracing_appender::rolling::daily(shellexpand::tilde(dir).into_owned(), LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), FILE_FILTER)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, TERMINAL_FILTER),
    };

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    match settings.log_format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(writer))
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(settings.log_dir.is_none())
                        .with_writer(writer),
                )
                .try_init()?;
        }
    }

    Ok(guard)
}
