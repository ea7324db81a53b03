//! Error types for the running-instance descriptor.
//!
//! Every fallible operation in this crate returns [`DbStateError`]. Parse
//! failures while loading the descriptor are not errors; see
//! [`crate::running_info::LoadOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the dbstate library.
#[derive(Debug, Error)]
pub enum DbStateError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Listen address errors
    #[error("Failed to resolve listen addresses: {message}")]
    AddressResolution {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for dbstate operations.
pub type Result<T> = std::result::Result<T, DbStateError>;

impl From<std::io::Error> for DbStateError {
    fn from(err: std::io::Error) -> Self {
        DbStateError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for DbStateError {
    fn from(err: serde_json::Error) -> Self {
        DbStateError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl DbStateError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        DbStateError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create an address resolution error from an enumerator failure.
    pub fn address_resolution(message: impl Into<String>, err: std::io::Error) -> Self {
        DbStateError::AddressResolution {
            message: message.into(),
            source: Some(err),
        }
    }

    /// True when the underlying IO failure was "file not found".
    ///
    /// Lets callers of [`crate::RunningInfoStore::remove`] tolerate an
    /// already-removed descriptor if they choose to.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbStateError::Io {
                source: Some(err),
                ..
            } if err.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = DbStateError::Config {
            message: "no data directory".into(),
        };
        assert_eq!(err.to_string(), "Configuration error: no data directory");
    }

    #[test]
    fn test_io_with_path_keeps_path() {
        let err = DbStateError::io_with_path(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            "/tmp/running_db.json",
        );
        match err {
            DbStateError::Io { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/running_db.json")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_not_found() {
        let missing: DbStateError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(missing.is_not_found());

        let denied: DbStateError = io::Error::new(io::ErrorKind::PermissionDenied, "no").into();
        assert!(!denied.is_not_found());

        let resolution = DbStateError::address_resolution(
            "loopback",
            io::Error::new(io::ErrorKind::NotFound, "no interfaces"),
        );
        assert!(!resolution.is_not_found());
    }
}
