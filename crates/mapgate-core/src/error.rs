//! Error types for mapgate-core

use thiserror::Error;

/// Result type alias for mapgate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mapgate-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A repository lookup failed (connection loss, driver error, ...).
    #[error("Repository error: {message}")]
    Repository {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An identifier could not be used for a lookup.
    #[error("Invalid id: '{id}'")]
    InvalidId {
        /// The offending identifier
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a new repository error with a message.
    pub fn repository<S: Into<String>>(message: S) -> Self {
        Error::Repository {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new repository error with a message and source error.
    pub fn repository_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Repository {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid id error.
    pub fn invalid_id<S: Into<String>>(id: S) -> Self {
        Error::InvalidId { id: id.into() }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
