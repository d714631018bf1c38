//! Core error types for the dairy bookkeeping application.
//!
//! This module defines backend-agnostic error types. Backend-specific errors
//! (file I/O, HTTP, spreadsheet API) are converted to these types by the
//! storage crates.

use chrono::ParseError as ChronoParseError;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    /// The store could not be opened or provisioned. Only raised while a
    /// store is being constructed; the caller should pick another backend.
    #[error("Storage provisioning failed: {0}")]
    Provisioning(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing durable storage failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// A persisted collection could not be decoded.
    #[error("Corrupt data in {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The remote store rejected or failed a request.
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Credentials were rejected or a token could not be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

/// What a caller should do after an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The backend is unusable; construct a different one.
    SwitchBackend,
    /// The failure may be transient; the same call can be repeated.
    Retry,
    /// Retrying will not help.
    Fatal,
}

impl Error {
    /// Classifies the error for the backend selector.
    ///
    /// ```
    /// use dairy_core::errors::{Error, Recovery, StorageError};
    ///
    /// let err = Error::Provisioning("sheet not shared".to_string());
    /// assert_eq!(err.recovery(), Recovery::SwitchBackend);
    ///
    /// let err = Error::Storage(StorageError::Remote("503".to_string()));
    /// assert_eq!(err.recovery(), Recovery::Retry);
    /// ```
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Provisioning(_) => Recovery::SwitchBackend,
            Self::Storage(StorageError::Remote(_)) | Self::Storage(StorageError::Auth(_)) => {
                Recovery::Retry
            }
            Self::Storage(StorageError::Io { .. })
            | Self::Storage(StorageError::Corrupt { .. })
            | Self::Validation(_)
            | Self::Unexpected(_) => Recovery::Fatal,
        }
    }

    pub fn is_provisioning(&self) -> bool {
        matches!(self, Self::Provisioning(_))
    }
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_switches_backend() {
        let err = Error::Provisioning("cannot create document".to_string());
        assert_eq!(err.recovery(), Recovery::SwitchBackend);
        assert!(err.is_provisioning());
    }

    #[test]
    fn test_remote_and_auth_errors_retry() {
        let err: Error = StorageError::Remote("timeout".to_string()).into();
        assert_eq!(err.recovery(), Recovery::Retry);

        let err: Error = StorageError::Auth("token expired".to_string()).into();
        assert_eq!(err.recovery(), Recovery::Retry);
        assert!(!err.is_provisioning());
    }

    #[test]
    fn test_durable_io_is_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = StorageError::io("/data/expenses.json", io).into();
        assert_eq!(err.recovery(), Recovery::Fatal);
        assert_eq!(
            err.to_string(),
            "Storage operation failed: I/O error on /data/expenses.json: denied"
        );
    }
}
