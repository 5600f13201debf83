//! Logging initialisation via tracing-subscriber.
//!
//! The configured level applies to this crate only; every other target is
//! held at `warn`. A `RUST_LOG` value replaces the whole filter.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const CRATE_TARGET: &str = "worker_db";
const OTHER_TARGETS: &str = "warn";

/// Filter directive for `level`. A bare level is scoped to this crate; a
/// full directive string (containing `=` or `,`) is passed through unchanged.
pub fn directive(level: &str) -> Result<String, AppError> {
    if level.contains('=') || level.contains(',') {
        return Ok(level.to_string());
    }
    let parsed = parse_level(level)?.to_string().to_ascii_lowercase();
    Ok(format!("{OTHER_TARGETS},{CRATE_TARGET}={parsed}"))
}

/// Initialise the global tracing subscriber, writing to stderr.
///
/// If `prefer_level` is `true`, `level` wins and `RUST_LOG` is only a
/// fallback for an invalid `level`. Otherwise `RUST_LOG` wins.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let configured = directive(level).and_then(|d| {
        EnvFilter::try_new(&d)
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
    });

    let filter = if prefer_level {
        match configured {
            Ok(filter) => filter,
            Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!("{level_err}; RUST_LOG parse failed: {env_err}"))
            })?,
        }
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => configured?,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Parse a log level string into a [`LevelFilter`].
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
