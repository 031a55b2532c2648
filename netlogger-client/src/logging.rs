use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

use crate::config::ClientConfig;

const LOG_PREFIX: &str = "netlogger";
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the file writer flushing; drop it last.
#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

fn checked_level(level: &str) -> &str {
    if matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        level
    } else {
        eprintln!("Invalid log level '{}', defaulting to 'info'", level);
        "info"
    }
}

/// Stderr plus daily-rolling file logging. `RUST_LOG` refines the configured
/// level. Must be called from inside a tokio runtime (old-log pruning runs as
/// a background task).
pub fn init_logging(config: &ClientConfig) -> anyhow::Result<LogGuard> {
    let log_dir = PathBuf::from(&config.log_dir);
    let level = checked_level(&config.log_level);

    let builder = EnvFilter::builder().with_default_directive(
        level
            .parse::<Directive>()
            .with_context(|| format!("Bad log level {:?}", level))?,
    );
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {:?}", log_dir))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Global tracing subscriber already set")?;

    let max_age = Duration::from_secs(60 * 60 * 24 * config.log_retention_days);
    start_log_cleanup_task(log_dir, max_age);

    Ok(LogGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, max_age: Duration) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = prune_old_logs(&log_dir, LOG_PREFIX, max_age) {
                tracing::warn!("Failed to prune old log files: {}", e);
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Delete `<prefix>*.log` files in `log_dir` last modified more than `max_age` ago.
/// Returns how many were removed.
fn prune_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::info!("Old log file deleted: {}", file_name);
            removed += 1;
        }
    }

    Ok(removed)
}
