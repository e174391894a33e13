//! Logging setup.
//!
//! Logs go to a daily-rolling file so they never interleave with the REPL.
//! `RUST_LOG` overrides the default `info` filter.

use contextqa_infrastructure::ContextQaPaths;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "contextqa.log";

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the lifetime of the program; dropping
/// it flushes pending records. Returns `None` when no log file could be
/// opened, in which case logging is disabled.
pub fn init_logging(paths: &ContextQaPaths) -> Option<WorkerGuard> {
    let logs_dir = paths.logs_dir().ok()?;
    init_file_logging(&logs_dir)
}

fn init_file_logging(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!("Logging disabled: cannot create {:?}: {}", logs_dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
