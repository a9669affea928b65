//! Error types shared by the store, the messaging service and the server.

use thiserror::Error;

/// Main error type of the chat subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Request was rejected before anything was persisted
    #[error("{0}")]
    Validation(String),

    /// Missing, unknown or wrong-role credential
    #[error("{0}")]
    Unauthorized(String),

    /// Claimed identity differs from the authenticated one
    #[error("{0}")]
    Forbidden(String),

    /// Any persistence failure, uncategorized
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using [`ChatError`].
pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChatError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ChatError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ChatError::Forbidden(message.into())
    }
}

impl From<rusqlite::Error> for ChatError {
    fn from(err: rusqlite::Error) -> Self {
        ChatError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Config(err.to_string())
    }
}
