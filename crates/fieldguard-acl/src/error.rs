//! Error types for fieldguard-acl

use thiserror::Error;

/// Result type alias for fieldguard-acl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fieldguard-acl
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from fieldguard-core
    #[error("Core error: {0}")]
    Core(#[from] fieldguard_core::Error),

    /// The grant/classification lookup failed.
    ///
    /// Raised by [`AccessLookup`](crate::AccessLookup) implementations and
    /// propagated untouched; the engine never retries.
    #[error("Lookup error: {message}")]
    Lookup {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid engine configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a new lookup error with a message.
    pub fn lookup<S: Into<String>>(message: S) -> Self {
        Error::Lookup {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new lookup error with a message and source error.
    pub fn lookup_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Lookup {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether this error should surface as a client error (vs. a server fault).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Core(inner) => inner.is_client_error(),
            Error::Lookup { .. } | Error::Config { .. } => false,
        }
    }
}
