//! Error types for Gantry
//!
//! Component crates define their own precise error enums; this module
//! provides the common error surface the orchestration layers work with.
//! Recoverable outcomes (a failed fetch attempt, an exhausted peer list)
//! are always expressed as `Err` values, never as panics; panics are
//! reserved for caller contract violations.

use thiserror::Error;

/// Common result type for Gantry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Gantry
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("metadata store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a transfer error
    pub fn transfer(msg: impl Into<String>) -> Self {
        Self::Transfer(msg.into())
    }

    /// Create a metadata store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Check if this error represents an expected, retryable condition
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transfer(_) | Self::Io(_))
    }
}
