//! Error types for elastik
//!
//! Result views never fail: missing or malformed payload fields degrade to
//! defaults. Errors only surface from the strict entry points (decoding a
//! body on request, converting a backend error reply, loading configuration).
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for elastik operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for elastik
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Text that should be JSON could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend reported an error in its reply
    #[error("Backend error (status {}): {reason}", status_text(.status))]
    Backend {
        /// HTTP status, if the transport recorded one
        status: Option<u16>,
        /// Error reason extracted from the payload
        reason: String,
    },

    /// A configured field path could not be parsed
    #[error("Invalid field path for '{key}' ('{path}'): {reason}")]
    InvalidPath {
        /// Layout key the path was configured under
        key: String,
        /// The offending path text
        path: String,
        /// Parser message
        reason: String,
    },

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_text(status: &Option<u16>) -> String {
    status.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl Error {
    /// Whether this error came from the backend rather than the client
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend { .. })
    }
}
