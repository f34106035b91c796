//! Error types for mapgate-acl

use std::path::PathBuf;

use mapgate_core::ResourceKind;
use thiserror::Error;

/// Result type alias for mapgate-acl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mapgate-acl
///
/// During evaluation every variant is a fault: the evaluator logs it and
/// denies. Only policy loading surfaces these to callers directly.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from mapgate-core (repository faults, malformed ids)
    #[error("Core error: {0}")]
    Core(#[from] mapgate_core::Error),

    /// An operation argument holds a value that cannot be used as an id.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// What went wrong
        message: String,
    },

    /// A guard panicked while computing a decision.
    #[error("Guard panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string
        message: String,
    },

    /// The same resource kind appears twice in one argument map.
    #[error("Duplicate resource kind '{kind}' in argument map")]
    DuplicateKind {
        /// The repeated kind
        kind: ResourceKind,
    },

    /// Policy configuration could not be parsed.
    #[error("Policy configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Policy file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
