//! Tracing initialization.
//!
//! Reads the `MIX_LOG` environment variable for filtering, e.g.
//! `MIX_LOG=mix_strength=debug`. Falls back to `mix_strength=info`.
//!
//! The TUI owns the terminal, so it only logs when a file is configured.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const FILTER_ENV: &str = "MIX_LOG";
const FILE_ENV: &str = "MIX_LOG_FILE";
const DEFAULT_FILTER: &str = "mix_strength=info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

impl LogTarget {
    /// Pick a target: an explicit file wins, then `MIX_LOG_FILE`, then the
    /// front-end default (stderr for one-shot commands, off for the TUI).
    pub fn resolve(flag: Option<&Path>, interactive: bool) -> Self {
        Self::resolve_with(flag, std::env::var(FILE_ENV).ok(), interactive)
    }

    fn resolve_with(flag: Option<&Path>, env_file: Option<String>, interactive: bool) -> Self {
        if let Some(path) = flag {
            return LogTarget::File(path.to_path_buf());
        }
        if let Some(path) = env_file.filter(|p| !p.trim().is_empty()) {
            return LogTarget::File(PathBuf::from(path));
        }
        if interactive { LogTarget::Off } else { LogTarget::Stderr }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(target: &LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::input(format!("Failed to open log file '{}': {e}", path.display())))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_wins() {
        let t = LogTarget::resolve(Some(Path::new("mix.log")), true);
        assert_eq!(t, LogTarget::File(PathBuf::from("mix.log")));
        let t = LogTarget::resolve_with(Some(Path::new("mix.log")), Some("env.log".into()), false);
        assert_eq!(t, LogTarget::File(PathBuf::from("mix.log")));
    }

    #[test]
    fn env_file_beats_front_end_default() {
        let t = LogTarget::resolve_with(None, Some("env.log".into()), true);
        assert_eq!(t, LogTarget::File(PathBuf::from("env.log")));
        assert_eq!(LogTarget::resolve_with(None, Some("  ".into()), true), LogTarget::Off);
    }

    #[test]
    fn default_depends_on_front_end() {
        assert_eq!(LogTarget::resolve_with(None, None, false), LogTarget::Stderr);
        assert_eq!(LogTarget::resolve_with(None, None, true), LogTarget::Off);
    }

    #[test]
    fn off_is_a_noop() {
        assert!(init(&LogTarget::Off).is_ok());
    }
}
