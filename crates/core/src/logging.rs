//! Log setup shared by chainscope binaries.
//!
//! Each component writes a daily file named after itself into
//! `~/.chainscope/logs` (or `$CHAINSCOPE_LOG_DIR` when set). The `chainscope`
//! CLI uses the component name `cli`, so a search run on 2024-01-21 lands in
//! `~/.chainscope/logs/cli.2024-01-21`. `RUST_LOG` overrides the default
//! `info` level.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable that moves the log directory.
pub const LOG_DIR_ENV: &str = "CHAINSCOPE_LOG_DIR";

/// Where log files go for the current environment.
pub fn log_dir() -> PathBuf {
    resolve_log_dir(
        std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_log_dir(explicit: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match explicit {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chainscope")
            .join("logs"),
    }
}

/// Installs the global subscriber: a daily rolling file for `component` under
/// [`log_dir`] and, when `to_stderr` is set, a colored stderr layer.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_in(&log_dir(), component, to_stderr)
}

fn init_logging_in(dir: &Path, component: &str, to_stderr: bool) -> WorkerGuard {
    let _ = std::fs::create_dir_all(dir);

    let file_appender = tracing_appender::rolling::daily(dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        let _ = registry.with(stderr_layer).try_init();
    } else {
        let _ = registry.try_init();
    }

    guard
}
