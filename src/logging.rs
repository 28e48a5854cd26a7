//! Tracing subscriber setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a file
//! under the system temp dir instead. `RUST_LOG` overrides the default filter.

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "sales-dash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    let result = match target {
        LogTarget::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File => {
            let path = log_file_path();
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::io(format!("Cannot open log file '{}': {e}", path.display())))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Arc::new(file))
                        .with_ansi(false),
                )
                .try_init()
        }
    };

    // A subscriber may already be installed (tests, embedding); keep it.
    if let Err(e) = result {
        tracing::debug!(error = %e, ?target, "tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_existing_subscriber() {
        assert!(init(LogTarget::Stderr).is_ok());
        assert!(init(LogTarget::Stderr).is_ok());
    }

    #[test]
    fn log_file_lives_in_temp_dir() {
        let path = log_file_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with(LOG_FILE_NAME));
    }
}
