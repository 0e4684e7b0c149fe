//! File logging. The terminal owns stdout, so nothing is logged there.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "memory-match.log";

/// Install a file subscriber writing to `dir/memory-match.log`.
///
/// `RUST_LOG` overrides the default `info` filter. Keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_logging(dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!("log file: {}", dir.join(LOG_FILE).display());
    Ok(guard)
}
