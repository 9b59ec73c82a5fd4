//! Logging setup on tracing-subscriber.
//!
//! The filter has two inputs: the shell's configured level and `RUST_LOG`.
//! Normally `RUST_LOG` wins, so one module can be turned up without editing
//! config. A level pinned through `SHELL_LOG_LEVEL` wins over `RUST_LOG`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Build the filter for `level`. With `pinned`, `level` is tried first and
/// `RUST_LOG` is the fallback; without it the order is reversed.
pub fn filter(level: &str, pinned: bool) -> Result<EnvFilter, AppError> {
    let resolved = if pinned {
        EnvFilter::try_new(level)
            .or_else(|_| EnvFilter::try_from_default_env())
            .map_err(|e| e.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| e.to_string())
    };
    resolved.map_err(|e| AppError::Logger(format!("no usable filter for level '{level}': {e}")))
}

/// Install the global subscriber, writing to stderr. Call once at startup.
pub fn init(level: &str, pinned: bool) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level, pinned)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Validate a plain level name (`error` … `trace`, or `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
