//! Application logging functionality
//!
//! Installs the tracing subscriber: stderr output filtered by `RUST_LOG` or
//! the `--log-level` flag, optionally mirrored into a daily log file under
//! the bezy-edit config directory.

use crate::core::config_file::ConfigFile;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::logs_dir()
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging
///
/// The returned guard flushes the log file when dropped, so hold on to it
/// for as long as the program runs. Calling this twice keeps the first
/// subscriber.
pub fn init_logging(level: &str, log_file: bool) -> Option<WorkerGuard> {
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = if log_file {
        match fs::create_dir_all(logs_dir()) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(logs_dir(), "bezy-edit.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create logs directory {:?}: {}", logs_dir(), e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console)
        .with(file_layer)
        .try_init();

    match installed {
        Ok(()) => {
            info!(
                "=== bezy-edit started at {} ===",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            );
            if guard.is_some() {
                info!("Logs mirrored to: {:?}", logs_dir());
            }
        }
        Err(e) => warn!("Logging already initialized: {}", e),
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back() {
        let _ = env_filter("not a level!!");
        let _ = env_filter("debug");
    }

    #[test]
    fn logs_live_under_config_dir() {
        assert!(logs_dir().starts_with(ConfigFile::config_dir()));
        assert!(logs_dir().ends_with("logs"));
    }
}
