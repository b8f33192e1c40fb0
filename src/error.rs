//! Error types for capture configuration and invocation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a capture
#[derive(Error, Debug)]
pub enum Error {
    /// The URL is not a well-formed absolute URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A setter received a value it cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The renderer binary could not be found under the given directory
    #[error("Renderer binary not found in {}", .0.display())]
    MissingBinary(PathBuf),

    /// The render template for a capture mode does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The requested image format is not supported
    #[error("Unknown image format: {0}")]
    UnknownImageFormat(String),

    /// Filesystem failure while writing scripts or preparing output
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The background capture thread went away before answering
    #[error("Capture worker failed: {0}")]
    Worker(String),

    /// The job descriptor could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
