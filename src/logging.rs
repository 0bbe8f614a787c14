//! Console and per-run file logging.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Overrides the console filter, e.g. `MEDALCAL_LOG=info`
pub const LOG_ENV: &str = "MEDALCAL_LOG";

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// HTTP internals are noisy at debug
const DEFAULT_CONSOLE_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest=info,rustls=info,h2=info";

pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("medalcal_{}.log", started.format("%Y_%m_%d_%H_%M_%S"))
}

/// Install the console (DEBUG) and file (INFO) layers.
///
/// The returned guard flushes the file writer on drop, so keep it alive
/// until the process exits.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file_name(Local::now()));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}
