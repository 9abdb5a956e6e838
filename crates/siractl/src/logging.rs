//! Logging for siractl.
//!
//! One-shot commands log to stderr. The TUI logs to a file so tracing output
//! never draws over the alternate screen.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("SIRA_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log file path with fallback chain:
/// 1. $SIRACTL_LOG_FILE (explicit override)
/// 2. $XDG_STATE_HOME/sira/siractl.log
/// 3. ~/.local/state/sira/siractl.log
fn log_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SIRACTL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    if let Ok(state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(state).join("sira").join("siractl.log"));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("sira")
                .join("siractl.log"),
        );
    }
    None
}

/// Initialize tracing. `to_file` is set for the TUI.
pub fn init(to_file: bool) -> Result<()> {
    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    match log_file_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            // No home directory to log under, and stderr would corrupt the
            // TUI. Drop log output.
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}
