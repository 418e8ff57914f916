//! Local persistence error types.

use thiserror::Error;

/// Failure of a local store (reminders, persisted session).
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("failed to read store: {message}")]
    ReadFailed { message: String },

    #[error("failed to write store: {message}")]
    WriteFailed { message: String },

    #[error("store contents are corrupt: {message}")]
    Corrupt { message: String },

    #[error("secure storage error: {0}")]
    Secret(#[from] super::SecretError),
}

impl StoreError {
    #[must_use]
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::ReadFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}
