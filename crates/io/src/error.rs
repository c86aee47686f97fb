//! Error types for dowell-io.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from document encode/decode and the surrounding file handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the document file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or misses required fields.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The path does not carry a recognized extension.
    #[error("unrecognized file extension: {0}")]
    UnknownExtension(String),

    /// The storage gateway failed underneath the codec.
    #[error(transparent)]
    Store(#[from] dowell_store::error::Error),
}
