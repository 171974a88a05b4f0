//! tracing subscriber setup
//!
//! CLI mode logs to stderr. The TUI owns the terminal, so it logs to a
//! daily-rolled file under `~/.cabdash/logs` instead.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

pub const LOG_FILE_NAME: &str = "cabdash.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr (CLI commands)
pub fn init_stderr() {
    // A second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `{dir}/cabdash.log.YYYY-MM-DD` (TUI).
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_file(dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("cabdash: logging disabled, cannot create {}: {}", dir.display(), e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|_| guard)
}
