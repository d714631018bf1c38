//! Error types for the spreadsheet client.

use dairy_core::errors::{Error, StorageError};
use thiserror::Error;

/// Result type alias for spreadsheet client operations.
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Errors raised while talking to the remote spreadsheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the remote API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Credentials are malformed or a token could not be obtained
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A document or worksheet the caller referenced does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SheetsError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<SheetsError> for Error {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Auth(message) => Error::Storage(StorageError::Auth(message)),
            other => Error::Storage(StorageError::Remote(other.to_string())),
        }
    }
}
