//! Error types for fieldguard-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for fieldguard-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fieldguard-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the filtering engine
    #[error(transparent)]
    Acl(#[from] fieldguard_acl::Error),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its purpose
    #[error("Invalid {what} in {}: {source}", path.display())]
    Json {
        /// What the file was supposed to hold
        what: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description
        message: String,
    },
}

impl Error {
    /// I/O failure on `path`.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// JSON parse failure for a `what` file at `path`.
    pub fn json(what: &'static str, path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Error::Json {
            what,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
