//! Tracing subscriber setup.
//!
//! Filter precedence: `BOOTLINE_LOG`, then `RUST_LOG`, then `bootline=info`.
//! Both initializers are idempotent; if a global subscriber is already set
//! they leave it in place.

use bootline_shared::{BootlineError, BootlineResult};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "BOOTLINE_LOG";
const DEFAULT_FILTER: &str = "bootline=info";
const LOG_FILE_PREFIX: &str = "bootline.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Log to stderr and to a daily-rotated file under `dir`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. `None` means another subscriber was already
/// installed and nothing was changed.
pub fn init_logging_for(dir: &Path) -> BootlineResult<Option<WorkerGuard>> {
    std::fs::create_dir_all(dir).map_err(|e| {
        BootlineError::Config(format!(
            "failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init();

    match result {
        Ok(()) => Ok(Some(guard)),
        Err(_) => {
            tracing::debug!("Global subscriber already installed");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!("still logging");
    }

    #[test]
    fn test_init_logging_for_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("logs").join("nested");

        let _guard = init_logging_for(&dir).unwrap();

        assert!(dir.is_dir());
    }
}
