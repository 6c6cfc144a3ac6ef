//! Centralized error types for contactrank.
//!
//! The aggregation engine and the query views never fail. Everything here is
//! raised at the edges: reading a message batch or looking up a contact by
//! address.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the contactrank library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("Message source not found: {0}")]
    FileNotFound(PathBuf),

    /// The file is JSON but does not have the shape of a message batch.
    #[error("Invalid message batch in '{path}': {reason}")]
    InvalidBatch { path: PathBuf, reason: String },

    /// The file does not appear to be a valid MBOX.
    #[error("File does not appear to be a valid MBOX: {0}")]
    InvalidMbox(PathBuf),

    /// The requested source format is not known.
    #[error("Unknown source format '{0}'. Supported: auto, json, mbox")]
    UnknownFormat(String),

    /// No contact with this address exists in the current directory.
    #[error("No contact with address '{0}'")]
    ContactNotFound(String),
}

/// Convenience alias for `Result<T, ScanError>`.
pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (prefer `ScanError::io`).
impl From<std::io::Error> for ScanError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_path() {
        let err = ScanError::io(
            "/tmp/batch.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/batch.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_contact_not_found_message() {
        let err = ScanError::ContactNotFound("a@x.com".to_string());
        assert_eq!(err.to_string(), "No contact with address 'a@x.com'");
    }
}
