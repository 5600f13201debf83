//! Application-wide error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::properties::ParseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    /// The persistence file or its directory could not be created or cleared.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The persistence file exists but is not a valid property list.
    #[error("malformed persistence file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
